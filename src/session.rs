use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};

use crate::api::SessionApi;
use crate::domain::User;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionPhase {
    /// The initial `/auth/me` check has not completed.
    #[default]
    Pending,
    Resolved(Option<User>),
}

/// What a guarded page should do with the current session.
#[derive(Debug, Clone, PartialEq)]
pub enum Guard {
    Pending,
    Allow(User),
    Redirect(String),
}

/// Cookie-backed identity shared by every page of one portal instance.
pub struct AuthSession {
    api: Arc<dyn SessionApi>,
    phase: RwLock<SessionPhase>,
    checked: OnceCell<()>,
}

impl AuthSession {
    pub fn new(api: Arc<dyn SessionApi>) -> Self {
        Self {
            api,
            phase: RwLock::new(SessionPhase::Pending),
            checked: OnceCell::new(),
        }
    }

    /// Run the initial session check. Only the first call reaches the
    /// server; later and concurrent callers wait for that result.
    pub async fn start(&self) {
        self.checked
            .get_or_init(|| async {
                let user = match self.api.current_user().await {
                    Ok(user) => user,
                    Err(e) => {
                        tracing::warn!("Session check failed: {}", e);
                        None
                    }
                };
                tracing::debug!(authenticated = user.is_some(), "Session resolved");
                let mut phase = self.phase.write().await;
                // A login or logout during the check wins.
                if *phase == SessionPhase::Pending {
                    *phase = SessionPhase::Resolved(user);
                }
            })
            .await;
    }

    pub async fn phase(&self) -> SessionPhase {
        self.phase.read().await.clone()
    }

    pub async fn is_loading(&self) -> bool {
        *self.phase.read().await == SessionPhase::Pending
    }

    pub async fn user(&self) -> Option<User> {
        match &*self.phase.read().await {
            SessionPhase::Resolved(user) => user.clone(),
            SessionPhase::Pending => None,
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user().await.is_some()
    }

    /// Record a user the login page has just authenticated.
    pub async fn login(&self, user: User) {
        tracing::info!(username = %user.username, "Signed in");
        *self.phase.write().await = SessionPhase::Resolved(Some(user));
    }

    /// Ask the server to end the session, then forget the user locally
    /// whatever the server said. The server's error, if any, is returned
    /// after the local state is already cleared.
    pub async fn logout(&self) -> Result<()> {
        let outcome = self.api.logout().await;
        if let Err(e) = &outcome {
            tracing::warn!("Logout request failed, clearing session anyway: {}", e);
        }
        *self.phase.write().await = SessionPhase::Resolved(None);
        tracing::info!("Signed out");
        outcome
    }

    /// Decide access for a protected page without waiting.
    pub async fn guard(&self, login_path: &str) -> Guard {
        match self.phase().await {
            SessionPhase::Pending => Guard::Pending,
            SessionPhase::Resolved(Some(user)) => Guard::Allow(user),
            SessionPhase::Resolved(None) => Guard::Redirect(login_path.to_string()),
        }
    }
}

use std::sync::Arc;
use tokio::sync::RwLock;

/// Client-side storage for the admin bearer token.
///
/// Cloning shares the same slot, so a token set after login is seen by
/// every manager holding the client.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(initial.filter(|t| !t.is_empty()))),
        }
    }

    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set(&self, token: impl Into<String>) {
        let token = token.into();
        *self.token.write().await = if token.is_empty() { None } else { Some(token) };
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
    }
}

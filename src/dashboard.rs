use std::sync::Arc;

use crate::{
    context::{PortalApi, PortalContext},
    domain::{Announcement, Event, TimetableEntry, User},
    manager::{AdminManager, ArchiveManager},
    session::{AuthSession, Guard},
};

/// The admin area: one manager per collection, behind the session guard.
pub struct AdminDashboard {
    pub announcements: AdminManager<Announcement>,
    pub events: AdminManager<Event>,
    pub archive: ArchiveManager,
    pub timetables: AdminManager<TimetableEntry>,
    user: User,
    session: Arc<AuthSession>,
    login_path: String,
}

pub enum DashboardAccess {
    Granted(Box<AdminDashboard>),
    Redirect(String),
}

impl AdminDashboard {
    /// Wait for the session check, then either redirect to the login page
    /// or build and load every manager.
    ///
    /// A manager whose load fails is still handed out, in its `Failed`
    /// state with an empty collection.
    pub async fn open<A: PortalApi>(context: &PortalContext<A>) -> DashboardAccess {
        context.session.start().await;

        let login_path = context.settings.auth.login_path.clone();
        let user = match context.session.guard(&login_path).await {
            Guard::Allow(user) => user,
            Guard::Redirect(path) => {
                tracing::info!(path = %path, "Dashboard requires sign-in");
                return DashboardAccess::Redirect(path);
            }
            // start() has resolved the session by now
            Guard::Pending => return DashboardAccess::Redirect(login_path),
        };

        let mut announcements = context.manager::<Announcement>();
        let mut events = context.manager::<Event>();
        let mut archive = context.archive_manager();
        let mut timetables = context.manager::<TimetableEntry>();

        let (a, e, r, t) = tokio::join!(
            announcements.load(),
            events.load(),
            archive.load(),
            timetables.load()
        );
        let failed = [a.is_err(), e.is_err(), r.is_err(), t.is_err()]
            .into_iter()
            .filter(|failed| *failed)
            .count();
        tracing::info!(username = %user.username, failed, "Dashboard opened");

        DashboardAccess::Granted(Box::new(Self {
            announcements,
            events,
            archive,
            timetables,
            user,
            session: context.session.clone(),
            login_path,
        }))
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// End the session and return where to send the browser. The local
    /// session is cleared even when the server call fails.
    pub async fn logout(self) -> String {
        // failure already logged by the session
        let _ = self.session.logout().await;
        self.login_path
    }
}

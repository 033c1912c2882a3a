use std::sync::Arc;
use std::time::Duration;

use crate::{
    api::{ApiClient, ResourceApi, SessionApi, UploadApi},
    config::Settings,
    domain::{Announcement, ArchiveEntry, ArchiveItem, Event, Resource, TimetableEntry},
    error::Result,
    feed::{ArchiveListing, Listing, PublicFeed},
    manager::{AdminManager, ArchiveManager},
    session::AuthSession,
};

/// Everything the portal talks to: every collection, the session
/// endpoints and uploads.
pub trait PortalApi:
    ResourceApi<Announcement>
    + ResourceApi<Event>
    + ResourceApi<ArchiveItem>
    + ResourceApi<TimetableEntry>
    + SessionApi
    + UploadApi
    + 'static
{
}

impl<T> PortalApi for T where
    T: ResourceApi<Announcement>
        + ResourceApi<Event>
        + ResourceApi<ArchiveItem>
        + ResourceApi<TimetableEntry>
        + SessionApi
        + UploadApi
        + 'static
{
}

/// Shared state for one running portal: settings, the API client and the
/// auth session, handed explicitly to every page.
pub struct PortalContext<A = ApiClient> {
    pub settings: Arc<Settings>,
    pub api: Arc<A>,
    pub session: Arc<AuthSession>,
}

impl<A> Clone for PortalContext<A> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            api: self.api.clone(),
            session: self.session.clone(),
        }
    }
}

impl PortalContext<ApiClient> {
    pub fn new(settings: Settings) -> Result<Self> {
        let api = Arc::new(ApiClient::new(&settings)?);
        tracing::info!(base_url = api.base_url(), "Portal client ready");
        Ok(Self::with_api(settings, api))
    }
}

impl<A: PortalApi> PortalContext<A> {
    pub fn with_api(settings: Settings, api: Arc<A>) -> Self {
        let session = Arc::new(AuthSession::new(api.clone()));
        Self {
            settings: Arc::new(settings),
            api,
            session,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.settings.polling.interval()
    }

    pub fn manager<R: Resource>(&self) -> AdminManager<R>
    where
        A: ResourceApi<R>,
    {
        AdminManager::new(self.api.clone(), self.api.clone())
    }

    pub fn archive_manager(&self) -> ArchiveManager {
        ArchiveManager::new(
            self.api.clone(),
            self.api.clone(),
            self.api.clone(),
            self.api.clone(),
        )
    }

    pub fn feed<R: Resource>(&self) -> PublicFeed<R>
    where
        A: ResourceApi<R>,
    {
        PublicFeed::new(Arc::new(Listing::<R>(self.api.clone())))
    }

    pub fn archive_feed(&self) -> PublicFeed<ArchiveEntry> {
        PublicFeed::new(Arc::new(ArchiveListing {
            archives: self.api.clone(),
            events: self.api.clone(),
            announcements: self.api.clone(),
        }))
    }
}

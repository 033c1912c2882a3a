//! Read-only collections behind the public pages, kept fresh by polling.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::api::ResourceApi;
use crate::domain::{group_by_level, Announcement, ArchiveEntry, ArchiveItem, Event, Resource, TimetableEntry};
use crate::error::Result;
use crate::manager::archive::fetch_synthesized;
use crate::poll::Poller;
use crate::search::{filter, Searchable};

/// Where a feed gets its items from.
#[async_trait]
pub trait FeedSource<T>: Send + Sync {
    async fn fetch(&self) -> Result<Vec<T>>;
}

/// One REST collection, listed as is.
pub struct Listing<R: Resource>(pub Arc<dyn ResourceApi<R>>);

#[async_trait]
impl<R: Resource> FeedSource<R> for Listing<R> {
    async fn fetch(&self) -> Result<Vec<R>> {
        self.0.list().await
    }
}

/// The public archive: archive items, then events, then announcements.
pub struct ArchiveListing {
    pub archives: Arc<dyn ResourceApi<ArchiveItem>>,
    pub events: Arc<dyn ResourceApi<Event>>,
    pub announcements: Arc<dyn ResourceApi<Announcement>>,
}

#[async_trait]
impl FeedSource<ArchiveEntry> for ArchiveListing {
    async fn fetch(&self) -> Result<Vec<ArchiveEntry>> {
        let (archives, (events, announcements)) = tokio::join!(
            self.archives.list(),
            fetch_synthesized(self.events.as_ref(), self.announcements.as_ref())
        );
        Ok(ArchiveEntry::merge(archives?, events, announcements))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FeedStatus {
    #[default]
    Loading,
    Loaded,
    /// Shown inline as "failed to load"; the items are empty.
    Failed(String),
}

struct FeedState<T> {
    items: Vec<T>,
    status: FeedStatus,
    /// Ticket of the newest refresh written so far.
    applied: u64,
}

/// Shared, pollable view of one public collection.
pub struct PublicFeed<T> {
    source: Arc<dyn FeedSource<T>>,
    state: Arc<RwLock<FeedState<T>>>,
    issued: Arc<AtomicU64>,
}

impl<T> Clone for PublicFeed<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            state: self.state.clone(),
            issued: self.issued.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> PublicFeed<T> {
    pub fn new(source: Arc<dyn FeedSource<T>>) -> Self {
        Self {
            source,
            state: Arc::new(RwLock::new(FeedState {
                items: Vec::new(),
                status: FeedStatus::Loading,
                applied: 0,
            })),
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fetch once. A failure empties the feed and marks it failed; it is
    /// not retried until the next poll. A response that lands after a
    /// newer one has been applied is dropped.
    pub async fn refresh(&self) -> FeedStatus {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let fetched = self.source.fetch().await;
        let mut state = self.state.write().await;
        if ticket < state.applied {
            tracing::debug!(ticket, applied = state.applied, "Dropping stale feed response");
            return state.status.clone();
        }
        state.applied = ticket;
        match fetched {
            Ok(items) => {
                tracing::debug!(count = items.len(), "Feed refreshed");
                state.items = items;
                state.status = FeedStatus::Loaded;
            }
            Err(e) => {
                tracing::warn!("Feed refresh failed: {}", e);
                state.items.clear();
                state.status = FeedStatus::Failed(e.to_string());
            }
        }
        state.status.clone()
    }

    pub async fn status(&self) -> FeedStatus {
        self.state.read().await.status.clone()
    }

    pub async fn items(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }

    /// Refresh every `interval` until the returned handle is dropped.
    pub fn start_polling(&self, interval: Duration) -> Poller {
        let feed = self.clone();
        Poller::spawn(interval, move || {
            let feed = feed.clone();
            async move {
                feed.refresh().await;
            }
        })
    }
}

impl<T: Searchable + Clone + Send + Sync + 'static> PublicFeed<T> {
    pub async fn search(&self, query: &str) -> Vec<T> {
        let state = self.state.read().await;
        filter(&state.items, query).into_iter().cloned().collect()
    }
}

impl PublicFeed<TimetableEntry> {
    /// Matching entries grouped by level, each group in schedule order.
    pub async fn grouped(&self, query: &str) -> BTreeMap<String, Vec<TimetableEntry>> {
        let state = self.state.read().await;
        group_by_level(filter(&state.items, query))
            .into_iter()
            .map(|(level, entries)| {
                (level.to_string(), entries.into_iter().cloned().collect())
            })
            .collect()
    }
}

use std::sync::Arc;

use crate::{
    api::{ResourceApi, UploadApi},
    domain::{Announcement, ArchiveDraft, ArchiveEntry, ArchiveItem, Event, UploadedFile},
    error::{PortalError, Result},
    form::FormController,
    manager::{AdminManager, Confirm, DeleteOutcome},
    search::filter,
    store::ManagerState,
};

/// Archive admin: editable archive items listed together with read-only
/// projections of events and announcements.
pub struct ArchiveManager {
    inner: AdminManager<ArchiveItem>,
    events: Arc<dyn ResourceApi<Event>>,
    announcements: Arc<dyn ResourceApi<Announcement>>,
    synthesized: (Vec<Event>, Vec<Announcement>),
    entries: Vec<ArchiveEntry>,
}

impl ArchiveManager {
    pub fn new(
        archives: Arc<dyn ResourceApi<ArchiveItem>>,
        events: Arc<dyn ResourceApi<Event>>,
        announcements: Arc<dyn ResourceApi<Announcement>>,
        uploads: Arc<dyn UploadApi>,
    ) -> Self {
        Self {
            inner: AdminManager::new(archives, uploads),
            events,
            announcements,
            synthesized: (Vec::new(), Vec::new()),
            entries: Vec::new(),
        }
    }

    pub fn state(&self) -> &ManagerState {
        self.inner.state()
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn form(&self) -> &FormController<ArchiveItem> {
        self.inner.form()
    }

    pub fn draft_mut(&mut self) -> Option<&mut ArchiveDraft> {
        self.inner.draft_mut()
    }

    pub fn search(&self, query: &str) -> Vec<&ArchiveEntry> {
        filter(&self.entries, query)
    }

    /// Load archives, events and announcements together. Only the archive
    /// list decides the manager state; the other two degrade to empty.
    pub async fn load(&mut self) -> Result<()> {
        let (outcome, synthesized) = tokio::join!(
            self.inner.load(),
            fetch_synthesized(self.events.as_ref(), self.announcements.as_ref())
        );
        self.synthesized = synthesized;
        self.rebuild();
        outcome
    }

    async fn refresh_synthesized(&mut self) {
        self.synthesized =
            fetch_synthesized(self.events.as_ref(), self.announcements.as_ref()).await;
    }

    fn rebuild(&mut self) {
        let (events, announcements) = &self.synthesized;
        self.entries = ArchiveEntry::merge(
            self.inner.items().to_vec(),
            events.clone(),
            announcements.clone(),
        );
    }

    pub fn open_create(&mut self) -> Result<()> {
        self.inner.open_create()
    }

    /// Open the dialog on an archive item. Event and announcement rows
    /// are refused without touching the dialog.
    pub fn handle_edit(&mut self, entry: &ArchiveEntry) -> Result<()> {
        let item = editable(entry)?;
        self.inner.handle_edit(&item.id)
    }

    pub fn close_dialog(&mut self) {
        self.inner.close_dialog();
    }

    pub async fn submit(&mut self) -> Result<ArchiveItem> {
        let outcome = self.inner.submit().await;
        if outcome.is_ok() {
            self.refresh_synthesized().await;
        }
        self.rebuild();
        outcome
    }

    pub async fn delete(&mut self, entry: &ArchiveEntry, confirm: &dyn Confirm) -> Result<DeleteOutcome> {
        let item = editable(entry)?;
        let outcome = self.inner.delete(&item.id, confirm).await;
        if matches!(outcome, Ok(DeleteOutcome::Deleted)) {
            self.refresh_synthesized().await;
        }
        self.rebuild();
        outcome
    }

    pub async fn upload(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<UploadedFile> {
        self.inner.upload(file_name, bytes).await
    }
}

fn editable(entry: &ArchiveEntry) -> Result<&ArchiveItem> {
    entry.as_archive().ok_or_else(|| {
        tracing::warn!(id = entry.id(), source = ?entry.source(), "Refusing to modify synthesized archive entry");
        PortalError::ReadOnly(format!("{:?} {} is not an archive item", entry.source(), entry.id()))
    })
}

pub(crate) async fn fetch_synthesized(
    events: &dyn ResourceApi<Event>,
    announcements: &dyn ResourceApi<Announcement>,
) -> (Vec<Event>, Vec<Announcement>) {
    let (events, announcements) = tokio::join!(events.list(), announcements.list());
    let events = events.unwrap_or_else(|e| {
        tracing::warn!("Error fetching events for archive: {}", e);
        Vec::new()
    });
    let announcements = announcements.unwrap_or_else(|e| {
        tracing::warn!("Error fetching announcements for archive: {}", e);
        Vec::new()
    });
    (events, announcements)
}

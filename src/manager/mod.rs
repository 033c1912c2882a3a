use std::sync::Arc;

use crate::{
    api::{ResourceApi, UploadApi},
    domain::{Attachable, Resource, SyncPolicy, UploadedFile},
    error::{PortalError, Result},
    form::FormController,
    search::{filter, Searchable},
    store::{ManagerState, ResourceStore},
};

pub mod archive;

pub use archive::ArchiveManager;

/// Asked before anything destructive happens.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Admin CRUD over one resource type: the collection, the create/edit
/// dialog, and an explicit lifecycle state.
pub struct AdminManager<R: Resource> {
    api: Arc<dyn ResourceApi<R>>,
    uploads: Arc<dyn UploadApi>,
    store: ResourceStore<R>,
    form: FormController<R>,
    state: ManagerState,
}

impl<R: Resource> AdminManager<R> {
    pub fn new(api: Arc<dyn ResourceApi<R>>, uploads: Arc<dyn UploadApi>) -> Self {
        Self {
            api,
            uploads,
            store: ResourceStore::new(),
            form: FormController::new(),
            state: ManagerState::Idle,
        }
    }

    pub fn state(&self) -> &ManagerState {
        &self.state
    }

    pub fn items(&self) -> &[R] {
        self.store.items()
    }

    pub fn form(&self) -> &FormController<R> {
        &self.form
    }

    pub fn draft_mut(&mut self) -> Option<&mut R::Draft> {
        self.form.draft_mut()
    }

    /// Fetch the collection. A failure is logged and leaves an empty
    /// collection in the `Failed` state.
    pub async fn load(&mut self) -> Result<()> {
        self.state.begin_load()?;
        let outcome = self.refetch().await;
        if let Err(e) = &outcome {
            tracing::error!("Error fetching {}: {}", R::PATH, e);
            self.store.clear();
        }
        self.state.finish(&outcome);
        outcome
    }

    async fn refetch(&mut self) -> Result<()> {
        let items = self.api.list().await?;
        tracing::debug!(count = items.len(), "Loaded {}", R::PATH);
        self.store.replace_all(items);
        Ok(())
    }

    pub fn open_create(&mut self) -> Result<()> {
        self.ensure_idle_dialog()?;
        self.form.open_create();
        Ok(())
    }

    /// Open the dialog on an existing item with its current values.
    pub fn handle_edit(&mut self, id: &str) -> Result<()> {
        self.ensure_idle_dialog()?;
        let entity = self
            .store
            .get(id)
            .ok_or_else(|| PortalError::NotFound(format!("{} {}", R::NAME, id)))?;
        self.form.open_edit(entity);
        Ok(())
    }

    pub fn close_dialog(&mut self) {
        if self.state != ManagerState::Submitting {
            self.form.close();
        }
    }

    fn ensure_idle_dialog(&self) -> Result<()> {
        if self.state.is_busy() {
            return Err(PortalError::Busy(format!("{} manager is {:?}", R::NAME, self.state)));
        }
        Ok(())
    }

    /// Send the open draft as one create or update.
    ///
    /// Required fields are checked first; an incomplete draft never
    /// reaches the network and leaves the state untouched.
    pub async fn submit(&mut self) -> Result<R> {
        let submission = self.form.prepare()?;
        self.state.begin_submit()?;

        let outcome = submission.send(self.api.as_ref()).await;
        self.form.finish(&outcome);

        let outcome = match outcome {
            Ok(saved) => {
                tracing::info!(id = saved.id(), "Saved {}", R::NAME);
                self.sync_saved(&saved).await;
                Ok(saved)
            }
            Err(e) => {
                tracing::error!("Error saving {}: {}", R::NAME, e);
                Err(e)
            }
        };
        self.state.finish(&outcome);
        outcome
    }

    // The write is already confirmed, so a failed refetch only logs and
    // patches the local copy.
    async fn sync_saved(&mut self, saved: &R) {
        if R::SYNC == SyncPolicy::Refetch {
            match self.refetch().await {
                Ok(()) => return,
                Err(e) => tracing::warn!("Saved {} but could not reload the list: {}", R::NAME, e),
            }
        }
        self.store.upsert(saved.clone());
    }

    async fn sync_deleted(&mut self, id: &str) {
        if R::SYNC == SyncPolicy::Refetch {
            match self.refetch().await {
                Ok(()) => return,
                Err(e) => tracing::warn!("Deleted {} but could not reload the list: {}", R::NAME, e),
            }
        }
        self.store.remove(id);
    }

    /// Delete after the user confirms. Refused while the dialog is open.
    pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> Result<DeleteOutcome> {
        if self.form.is_open() {
            return Err(PortalError::Busy(format!("close the {} dialog first", R::NAME)));
        }
        if self.store.get(id).is_none() {
            return Err(PortalError::NotFound(format!("{} {}", R::NAME, id)));
        }
        if !confirm.confirm(&format!("Are you sure you want to delete this {}?", R::NAME)) {
            return Ok(DeleteOutcome::Cancelled);
        }

        self.state.begin_submit()?;
        let outcome = match self.api.delete(id).await {
            Ok(()) => {
                tracing::info!(id, "Deleted {}", R::NAME);
                self.sync_deleted(id).await;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error deleting {}: {}", R::NAME, e);
                Err(e)
            }
        };
        self.state.finish(&outcome);
        outcome.map(|_| DeleteOutcome::Deleted)
    }
}

impl<R: Resource> AdminManager<R>
where
    R::Draft: Attachable,
{
    /// Upload a file and attach its URL to the open draft.
    pub async fn upload(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<UploadedFile> {
        if !self.form.is_open() {
            return Err(PortalError::Validation(format!(
                "open a {} form before uploading",
                R::NAME
            )));
        }

        let path = <R::Draft as Attachable>::UPLOAD_PATH;
        let file = self.uploads.upload(path, file_name, bytes).await.map_err(|e| {
            tracing::error!("File upload failed: {}", e);
            e
        })?;

        if let Some(draft) = self.form.draft_mut() {
            draft.attach(&file);
        }
        Ok(file)
    }
}

impl<R: Resource + Searchable> AdminManager<R> {
    pub fn search(&self, query: &str) -> Vec<&R> {
        filter(self.store.items(), query)
    }
}

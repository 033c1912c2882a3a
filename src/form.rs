use validator::Validate;

use crate::api::ResourceApi;
use crate::domain::Resource;
use crate::error::{PortalError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Closed,
    Create,
    Edit { id: String },
}

/// A validated draft, ready to send as exactly one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<D> {
    Create(D),
    Update { id: String, draft: D },
}

impl<D> Submission<D> {
    pub async fn send<R>(self, api: &dyn ResourceApi<R>) -> Result<R>
    where
        R: Resource<Draft = D>,
    {
        match self {
            Submission::Create(draft) => api.create(&draft).await,
            Submission::Update { id, draft } => api.update(&id, &draft).await,
        }
    }
}

/// Dialog state for creating or editing one entity.
///
/// The draft is a private copy; nothing reaches the collection until a
/// submission succeeds.
#[derive(Debug, Clone)]
pub struct FormController<R: Resource> {
    mode: FormMode,
    draft: R::Draft,
}

impl<R: Resource> Default for FormController<R> {
    fn default() -> Self {
        Self {
            mode: FormMode::Closed,
            draft: R::Draft::default(),
        }
    }
}

impl<R: Resource> FormController<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.mode {
            FormMode::Edit { id } => Some(id),
            _ => None,
        }
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    /// The draft is only writable while the dialog is open.
    pub fn draft_mut(&mut self) -> Option<&mut R::Draft> {
        if self.is_open() {
            Some(&mut self.draft)
        } else {
            None
        }
    }

    pub fn open_create(&mut self) {
        self.mode = FormMode::Create;
        self.draft = R::Draft::default();
    }

    pub fn open_edit(&mut self, entity: &R) {
        self.mode = FormMode::Edit {
            id: entity.id().to_string(),
        };
        self.draft = entity.to_draft();
    }

    /// Discard the draft. No side effects.
    pub fn close(&mut self) {
        self.mode = FormMode::Closed;
        self.draft = R::Draft::default();
    }

    /// Check required fields and freeze the draft into a submission.
    pub fn prepare(&self) -> Result<Submission<R::Draft>> {
        let draft = self.draft.clone();
        match &self.mode {
            FormMode::Closed => Err(PortalError::Validation(format!(
                "no open {} form",
                R::NAME
            ))),
            FormMode::Create => {
                draft.validate()?;
                Ok(Submission::Create(draft))
            }
            FormMode::Edit { id } => {
                draft.validate()?;
                Ok(Submission::Update {
                    id: id.clone(),
                    draft,
                })
            }
        }
    }

    /// Record the outcome of a sent submission. Success closes the dialog
    /// and resets the draft; failure keeps both so the user can retry.
    pub fn finish<T>(&mut self, outcome: &Result<T>) {
        if outcome.is_ok() {
            self.close();
        }
    }
}

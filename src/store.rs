use crate::domain::Resource;
use crate::error::{PortalError, Result};
use crate::search::{filter, Searchable};

/// Lifecycle of an admin manager.
///
/// `Failed` is "ready, but the last action went wrong": the collection is
/// still shown and new actions are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ManagerState {
    #[default]
    Idle,
    Loading,
    Ready,
    Submitting,
    Failed(String),
}

impl ManagerState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ManagerState::Loading | ManagerState::Submitting)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ManagerState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn begin_load(&mut self) -> Result<()> {
        if self.is_busy() {
            return Err(PortalError::Busy(format!("cannot load while {:?}", self)));
        }
        *self = ManagerState::Loading;
        Ok(())
    }

    pub fn begin_submit(&mut self) -> Result<()> {
        match self {
            ManagerState::Ready | ManagerState::Failed(_) => {
                *self = ManagerState::Submitting;
                Ok(())
            }
            other => Err(PortalError::Busy(format!("cannot submit while {:?}", other))),
        }
    }

    /// Leave `Loading` or `Submitting` with the outcome of the request.
    pub fn finish<T>(&mut self, outcome: &Result<T>) {
        *self = match outcome {
            Ok(_) => ManagerState::Ready,
            Err(e) => ManagerState::Failed(e.to_string()),
        };
    }
}

/// The in-memory collection behind one page or manager.
#[derive(Debug, Clone)]
pub struct ResourceStore<R> {
    items: Vec<R>,
}

impl<R> Default for ResourceStore<R> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<R: Resource> ResourceStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn replace_all(&mut self, items: Vec<R>) {
        self.items = items;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Swap in the server's copy of an existing item, or put a new one
    /// at the front.
    pub fn upsert(&mut self, item: R) {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item,
            None => self.items.insert(0, item),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<R> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }
}

impl<R: Resource + Searchable> ResourceStore<R> {
    pub fn search(&self, query: &str) -> Vec<&R> {
        filter(&self.items, query)
    }
}

//! In-memory stand-in for the portal API used by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::api::{ResourceApi, SessionApi, UploadApi};
use crate::domain::{Resource, UploadedFile, User};
use crate::error::{PortalError, Result};

#[derive(Default)]
pub(crate) struct FakeApi {
    collections: Mutex<HashMap<&'static str, Vec<Value>>>,
    requests: Mutex<Vec<String>>,
    user: Mutex<Option<User>>,
    offline: AtomicBool,
    lists_down: AtomicBool,
    next_id: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed<R: Resource + Serialize>(&self, items: &[R]) {
        let values = items
            .iter()
            .map(|item| serde_json::to_value(item).unwrap())
            .collect();
        self.collections.lock().unwrap().insert(R::PATH, values);
    }

    pub fn sign_in(&self, user: User) {
        *self.user.lock().unwrap() = Some(user);
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn go_online(&self) {
        self.offline.store(false, Ordering::SeqCst);
    }

    /// Keep writes working but answer every list with a 500.
    pub fn fail_lists(&self) {
        self.lists_down.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests seen so far, as `"METHOD path"`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: String) -> Result<()> {
        self.requests.lock().unwrap().push(request);
        if self.offline.load(Ordering::SeqCst) {
            return Err(PortalError::Transport("connection refused".into()));
        }
        Ok(())
    }

    fn stored<R: Resource>(&self, id: &str, draft: &R::Draft) -> Result<(Value, R)> {
        let mut value = serde_json::to_value(draft)?;
        if let Value::Object(map) = &mut value {
            map.insert("_id".into(), Value::String(id.to_string()));
        }
        let entity = serde_json::from_value(value.clone())?;
        Ok((value, entity))
    }
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for FakeApi {
    async fn list(&self) -> Result<Vec<R>> {
        self.record(format!("GET {}", R::PATH))?;
        if self.lists_down.load(Ordering::SeqCst) {
            return Err(PortalError::Api { status: 500, message: "database unavailable".into() });
        }
        let collections = self.collections.lock().unwrap();
        let values = collections.get(R::PATH).cloned().unwrap_or_default();
        Ok(serde_json::from_value(Value::Array(values))?)
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        self.record(format!("POST {}", R::PATH))?;
        let id = format!("{}-{}", R::PATH, self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let (value, entity) = self.stored::<R>(&id, draft)?;
        self.collections
            .lock()
            .unwrap()
            .entry(R::PATH)
            .or_default()
            .push(value);
        Ok(entity)
    }

    async fn update(&self, id: &str, draft: &R::Draft) -> Result<R> {
        self.record(format!("PUT {}/{}", R::PATH, id))?;
        let (value, entity) = self.stored::<R>(id, draft)?;
        let mut collections = self.collections.lock().unwrap();
        let slot = collections
            .get_mut(R::PATH)
            .and_then(|items| items.iter_mut().find(|v| v["_id"] == id))
            .ok_or_else(|| PortalError::Api { status: 404, message: "not found".into() })?;
        *slot = value;
        Ok(entity)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.record(format!("DELETE {}/{}", R::PATH, id))?;
        let mut collections = self.collections.lock().unwrap();
        let items = collections.entry(R::PATH).or_default();
        let before = items.len();
        items.retain(|v| v["_id"] != id);
        if items.len() == before {
            return Err(PortalError::Api { status: 404, message: "not found".into() });
        }
        Ok(())
    }
}

#[async_trait]
impl SessionApi for FakeApi {
    async fn current_user(&self) -> Result<Option<User>> {
        self.record("GET auth/me".into())?;
        Ok(self.user.lock().unwrap().clone())
    }

    async fn logout(&self) -> Result<()> {
        self.record("POST auth/logout".into())?;
        *self.user.lock().unwrap() = None;
        Ok(())
    }
}

#[async_trait]
impl UploadApi for FakeApi {
    async fn upload(&self, path: &str, file_name: &str, bytes: Vec<u8>) -> Result<UploadedFile> {
        self.record(format!("POST {}", path))?;
        Ok(UploadedFile {
            file_url: format!("https://files.test/{}", file_name),
            size_bytes: bytes.len() as u64,
        })
    }
}

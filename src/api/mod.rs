use async_trait::async_trait;

use crate::domain::{Resource, UploadedFile, User};
use crate::error::Result;

pub mod client;
pub mod token;

pub use client::ApiClient;
pub use token::TokenStore;

/// CRUD over one REST collection.
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    async fn list(&self) -> Result<Vec<R>>;
    async fn create(&self, draft: &R::Draft) -> Result<R>;
    async fn update(&self, id: &str, draft: &R::Draft) -> Result<R>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Cookie-backed session endpoints.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// The user behind the current session cookie, `None` when signed out.
    async fn current_user(&self) -> Result<Option<User>>;
    async fn logout(&self) -> Result<()>;
}

#[async_trait]
pub trait UploadApi: Send + Sync {
    /// Single-shot multipart upload of one `file` field.
    async fn upload(&self, path: &str, file_name: &str, bytes: Vec<u8>) -> Result<UploadedFile>;
}

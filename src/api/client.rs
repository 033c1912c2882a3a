use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    api::{ResourceApi, SessionApi, TokenStore, UploadApi},
    config::Settings,
    domain::{Resource, SessionPayload, UploadedFile, User},
    error::{PortalError, Result},
};

/// HTTP client for the portal REST API.
///
/// The underlying `reqwest` client keeps a cookie jar, so the session
/// cookie set by the server rides along on every later request. Writes
/// additionally carry the bearer token from the [`TokenStore`] when one is
/// present.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(settings.api.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: settings.api.base_url.trim_end_matches('/').to_string(),
            tokens: TokenStore::new(settings.auth.token.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.get().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PortalError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp)
    }

    async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let resp = Self::check(resp).await?;
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Lists arrive either as a bare array or wrapped as `{ "<path>": [...] }`.
fn unwrap_list<R: Resource>(body: Value) -> Result<Vec<R>> {
    let items = match body {
        Value::Array(_) => body,
        Value::Object(mut map) => map.remove(R::PATH).ok_or_else(|| {
            PortalError::Decode(format!("expected a list of {}", R::PATH))
        })?,
        other => {
            return Err(PortalError::Decode(format!(
                "expected a list of {}, got {}",
                R::PATH,
                other
            )))
        }
    };
    Ok(serde_json::from_value(items)?)
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for ApiClient {
    async fn list(&self) -> Result<Vec<R>> {
        let url = self.url(R::PATH);
        tracing::debug!(%url, "Listing {}", R::PATH);

        let resp = self.client.get(&url).send().await?;
        let body: Value = Self::read_json(resp).await?;
        unwrap_list(body)
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        let url = self.url(R::PATH);
        tracing::debug!(%url, "Creating {}", R::NAME);

        let request = self.authorize(self.client.post(&url).json(draft)).await;
        Self::read_json(request.send().await?).await
    }

    async fn update(&self, id: &str, draft: &R::Draft) -> Result<R> {
        let url = self.url(&format!("{}/{}", R::PATH, id));
        tracing::debug!(%url, "Updating {}", R::NAME);

        let request = self.authorize(self.client.put(&url).json(draft)).await;
        Self::read_json(request.send().await?).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.url(&format!("{}/{}", R::PATH, id));
        tracing::debug!(%url, "Deleting {}", R::NAME);

        let request = self.authorize(self.client.delete(&url)).await;
        Self::check(request.send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionApi for ApiClient {
    async fn current_user(&self) -> Result<Option<User>> {
        let resp = self.client.get(self.url("auth/me")).send().await?;

        if matches!(resp.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Ok(None);
        }

        let payload: SessionPayload = Self::read_json(resp).await?;
        Ok(payload.into_user())
    }

    async fn logout(&self) -> Result<()> {
        let resp = self.client.post(self.url("auth/logout")).send().await?;
        Self::check(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl UploadApi for ApiClient {
    async fn upload(&self, path: &str, file_name: &str, bytes: Vec<u8>) -> Result<UploadedFile> {
        let url = self.url(path);
        let size_bytes = bytes.len() as u64;
        tracing::debug!(%url, file_name, size_bytes, "Uploading file");

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self.client.post(&url).multipart(form).send().await?;
        let mut uploaded: UploadedFile = Self::read_json(resp).await?;
        uploaded.size_bytes = size_bytes;
        Ok(uploaded)
    }
}

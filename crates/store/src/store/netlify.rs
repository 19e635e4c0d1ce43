//! Netlify Blobs HTTP API store.
//!
//! Each card is one blob at `<api_base>/<site_id>/<store_name>/<key>`,
//! authenticated with `Authorization: Bearer <token>`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use url::Url;

use super::{BlobStore, StoreError, StoreProvider};
use crate::config::{ConfigError, NetlifyConfig, NetlifyCredentials, env_lookup};

/// Variable lookup used to resolve credentials on each request.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Provider that builds a [`NetlifyBlobStore`] from fresh credentials per request.
///
/// The underlying `reqwest::Client` (connection pool and timeout) is shared.
#[derive(Clone)]
pub struct NetlifyProvider {
    http: reqwest::Client,
    settings: NetlifyConfig,
    env: EnvLookup,
}

impl NetlifyProvider {
    /// Create a provider that reads credentials from the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(settings: NetlifyConfig) -> Result<Self, StoreError> {
        Self::with_env(settings, Arc::new(env_lookup))
    }

    /// Create a provider with a custom credential lookup.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_env(settings: NetlifyConfig, env: EnvLookup) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            http,
            settings,
            env,
        })
    }
}

impl std::fmt::Debug for NetlifyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetlifyProvider")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl StoreProvider for NetlifyProvider {
    fn resolve(&self) -> Result<Arc<dyn BlobStore>, ConfigError> {
        let credentials = NetlifyCredentials::from_lookup(&*self.env)?;
        Ok(Arc::new(NetlifyBlobStore::new(
            self.http.clone(),
            &self.settings,
            credentials,
        )))
    }
}

/// Blob store client for one site's card namespace.
#[derive(Debug, Clone)]
pub struct NetlifyBlobStore {
    http: reqwest::Client,
    api_base: Url,
    store_name: String,
    credentials: NetlifyCredentials,
}

impl NetlifyBlobStore {
    /// Create a store client.
    #[must_use]
    pub fn new(http: reqwest::Client, settings: &NetlifyConfig, credentials: NetlifyCredentials) -> Self {
        Self {
            http,
            api_base: settings.api_base.clone(),
            store_name: settings.store_name.clone(),
            credentials,
        }
    }

    /// URL of the blob stored under `key`. Each part is percent-encoded as a
    /// single path segment.
    fn blob_url(&self, key: &str) -> Result<Url, StoreError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidRequest("blobs API base cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend([
                self.credentials.site_id.as_str(),
                self.store_name.as_str(),
                key,
            ]);
        Ok(url)
    }
}

#[async_trait]
impl BlobStore for NetlifyBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let response = self
            .http
            .get(self.blob_url(key)?)
            .bearer_auth(self.credentials.token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(key, "blob not found");
            return Ok(None);
        }
        if !status.is_success() {
            tracing::warn!(key, status = status.as_u16(), "blob fetch failed");
            return Err(StoreError::Status(status.as_u16()));
        }

        Ok(Some(response.bytes().await?.to_vec()))
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        let response = self
            .http
            .put(self.blob_url(key)?)
            .bearer_auth(self.credentials.token.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(key, status = status.as_u16(), "blob write failed");
            return Err(StoreError::Status(status.as_u16()));
        }

        Ok(())
    }
}

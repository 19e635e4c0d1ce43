//! Blob store abstraction for card persistence.
//!
//! Cards are opaque JSON blobs addressed by their [`CardId`](note2u_core::CardId)
//! inside the `cards` namespace. Handlers never hold a store directly: they
//! ask a [`StoreProvider`] for one on every request, so store credentials are
//! read at request time and a missing credential fails only that request.
//!
//! # Implementations
//!
//! - [`NetlifyProvider`] / [`NetlifyBlobStore`] - Netlify Blobs HTTP API
//! - [`MemoryProvider`] / [`MemoryBlobStore`] - in-process map for local runs and tests

mod memory;
mod netlify;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ConfigError;

pub use memory::{MemoryBlobStore, MemoryProvider};
pub use netlify::{EnvLookup, NetlifyBlobStore, NetlifyProvider};

/// Errors from a blob store operation.
///
/// Display output is returned to API clients as `details`, so no variant may
/// carry credentials or full request URLs.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request did not complete within the configured timeout.
    #[error("blob store request timed out")]
    Timeout,

    /// The blob store could not be reached.
    #[error("blob store unreachable")]
    Unreachable,

    /// The blob store answered with a non-success status.
    #[error("blob store responded with status {0}")]
    Status(u16),

    /// Any other transport failure. The request URL is stripped.
    #[error("blob store transport error: {0}")]
    Transport(reqwest::Error),

    /// A stored blob could not be parsed as JSON.
    #[error("stored card is not valid JSON")]
    Corrupt,

    /// The request could not be built (e.g. a credential is not a valid header value).
    #[error("invalid blob store request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Unreachable
        } else {
            Self::Transport(err.without_url())
        }
    }
}

/// Key-value persistence for card blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch the blob stored under `key`; `Ok(None)` when absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `body` under `key`, replacing any previous value.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError>;
}

/// Resolves the blob store to use for a single request.
pub trait StoreProvider: Send + Sync {
    /// Build or hand out a store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the store's configuration is incomplete.
    fn resolve(&self) -> Result<Arc<dyn BlobStore>, ConfigError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_has_no_secrets() {
        assert_eq!(
            StoreError::Status(503).to_string(),
            "blob store responded with status 503"
        );
        assert_eq!(StoreError::Timeout.to_string(), "blob store request timed out");
        assert_eq!(StoreError::Unreachable.to_string(), "blob store unreachable");
    }
}

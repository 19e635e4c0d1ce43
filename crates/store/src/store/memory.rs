//! In-process blob store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BlobStore, StoreError, StoreProvider};
use crate::config::ConfigError;

/// Blob store backed by a `HashMap`. Contents do not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Whether the store holds no blobs.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        self.blobs.write().await.insert(key.to_owned(), body);
        Ok(())
    }
}

/// Provider that hands every request the same [`MemoryBlobStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    store: Arc<MemoryBlobStore>,
}

impl MemoryProvider {
    /// Create a provider over a fresh, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider over an existing store, so callers can inspect it.
    #[must_use]
    pub const fn with_store(store: Arc<MemoryBlobStore>) -> Self {
        Self { store }
    }

    /// The shared store.
    #[must_use]
    pub fn store(&self) -> Arc<MemoryBlobStore> {
        Arc::clone(&self.store)
    }
}

impl StoreProvider for MemoryProvider {
    fn resolve(&self) -> Result<Arc<dyn BlobStore>, ConfigError> {
        Ok(self.store())
    }
}

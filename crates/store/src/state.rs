//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{BackendKind, StoreConfig};
use crate::store::{MemoryProvider, NetlifyProvider, StoreError, StoreProvider};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The only shared resource is
/// the store provider; handlers hold no other mutable state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    provider: Arc<dyn StoreProvider>,
    backend: &'static str,
}

impl AppState {
    /// Create application state for the backend named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client for the Netlify backend fails to build.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let state = match config.backend {
            BackendKind::Netlify => Self::with_provider(
                Arc::new(NetlifyProvider::new(config.netlify.clone())?),
                "netlify",
            ),
            BackendKind::Memory => Self::with_provider(Arc::new(MemoryProvider::new()), "memory"),
        };
        Ok(state)
    }

    /// Create application state over an explicit provider.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn StoreProvider>, backend: &'static str) -> Self {
        Self {
            inner: Arc::new(AppStateInner { provider, backend }),
        }
    }

    /// Get the store provider.
    #[must_use]
    pub fn provider(&self) -> &dyn StoreProvider {
        self.inner.provider.as_ref()
    }

    /// Name of the configured backend, for logs.
    #[must_use]
    pub fn backend(&self) -> &'static str {
        self.inner.backend
    }
}

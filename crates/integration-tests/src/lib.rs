//! End-to-end test harness for the NOTE2U card store.
//!
//! Every test starts its own servers on ephemeral ports, so no external
//! services or credentials are needed:
//!
//! - [`spawn_store`] runs the real card store router over a given state.
//! - [`spawn_fake_blobs`] runs a stand-in for the Netlify Blobs API that
//!   checks the bearer token and keeps blobs in memory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p note2u-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::get,
};
use note2u_store::AppState;
use note2u_store::config::{CARDS_STORE_NAME, NetlifyConfig};
use note2u_store::store::{EnvLookup, MemoryProvider, NetlifyProvider};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use url::Url;

/// Site id the fake blobs API expects in every path.
pub const FAKE_SITE_ID: &str = "site-under-test";

/// Token the fake blobs API accepts.
pub const FAKE_TOKEN: &str = "nfp_test_token";

/// Serve `app` on `127.0.0.1:0` in the background and return its address.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });

    addr
}

/// Base URL for a server address.
#[must_use]
pub fn base_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}/")).expect("Socket address is a valid URL host")
}

/// Start the card store over `state`.
pub async fn spawn_store(state: AppState) -> Url {
    base_url(serve(note2u_store::router(state)).await)
}

/// Start the card store over a fresh in-memory backend.
pub async fn spawn_memory_store() -> (Url, MemoryProvider) {
    let provider = MemoryProvider::new();
    let url = spawn_store(AppState::with_provider(
        Arc::new(provider.clone()),
        "memory",
    ))
    .await;
    (url, provider)
}

/// Start the card store over the Netlify backend pointed at `blobs_api`,
/// resolving credentials through `env`.
pub async fn spawn_netlify_store(blobs_api: &Url, timeout: Duration, env: EnvLookup) -> Url {
    let settings = NetlifyConfig {
        api_base: blobs_api.clone(),
        store_name: CARDS_STORE_NAME.to_string(),
        timeout,
    };
    let provider = NetlifyProvider::with_env(settings, env).expect("Failed to build provider");
    spawn_store(AppState::with_provider(Arc::new(provider), "netlify")).await
}

/// Credential lookup that serves the fake blobs API's site id and token.
#[must_use]
pub fn fake_credentials() -> EnvLookup {
    Arc::new(|key: &str| match key {
        "SITE_ID" => Some(FAKE_SITE_ID.to_string()),
        "NETLIFY_API_TOKEN" => Some(FAKE_TOKEN.to_string()),
        _ => None,
    })
}

/// How the fake blobs API answers.
#[derive(Debug, Clone, Copy)]
pub enum BlobsBehavior {
    /// Behave like the real API.
    Normal,
    /// Answer every request with this status.
    Fail(StatusCode),
    /// Sleep this long before answering.
    Stall(Duration),
}

/// Handle on a running fake blobs API.
#[derive(Clone)]
pub struct FakeBlobs {
    /// Base URL to use as `NETLIFY_BLOBS_API`.
    pub url: Url,
    state: FakeBlobsState,
}

#[derive(Clone)]
struct FakeBlobsState {
    behavior: BlobsBehavior,
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    requests: Arc<AtomicUsize>,
}

impl FakeBlobs {
    /// Stored blob at `<site>/<store>/<key>`.
    pub async fn blob(&self, site: &str, store: &str, key: &str) -> Option<Vec<u8>> {
        self.state
            .blobs
            .read()
            .await
            .get(&format!("{site}/{store}/{key}"))
            .cloned()
    }

    /// Number of requests received so far, rejected ones included.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

/// Start a fake Netlify Blobs API.
pub async fn spawn_fake_blobs(behavior: BlobsBehavior) -> FakeBlobs {
    let state = FakeBlobsState {
        behavior,
        blobs: Arc::default(),
        requests: Arc::default(),
    };

    let app = Router::new()
        .route("/api/v1/blobs/{site}/{store}/{key}", get(get_blob).put(put_blob))
        .with_state(state.clone());
    let addr = serve(app).await;

    FakeBlobs {
        url: Url::parse(&format!("http://{addr}/api/v1/blobs")).expect("valid fake URL"),
        state,
    }
}

async fn admit(state: &FakeBlobsState, headers: &HeaderMap) -> Result<(), StatusCode> {
    state.requests.fetch_add(1, Ordering::SeqCst);

    match state.behavior {
        BlobsBehavior::Normal => {}
        BlobsBehavior::Fail(status) => return Err(status),
        BlobsBehavior::Stall(delay) => tokio::time::sleep(delay).await,
    }

    let expected = format!("Bearer {FAKE_TOKEN}");
    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if authorized {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn get_blob(
    State(state): State<FakeBlobsState>,
    Path((site, store, key)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Bytes, StatusCode> {
    admit(&state, &headers).await?;
    state
        .blobs
        .read()
        .await
        .get(&format!("{site}/{store}/{key}"))
        .cloned()
        .map(Bytes::from)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn put_blob(
    State(state): State<FakeBlobsState>,
    Path((site, store, key)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, StatusCode> {
    admit(&state, &headers).await?;
    state
        .blobs
        .write()
        .await
        .insert(format!("{site}/{store}/{key}"), body.to_vec());
    Ok(StatusCode::OK)
}

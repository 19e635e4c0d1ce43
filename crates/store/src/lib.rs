//! NOTE2U card store library.
//!
//! Persists shared cards under short ids and serves them back over a small
//! JSON API. The binary in `main.rs` wires this router to configuration,
//! logging and Sentry; tests drive [`router`] directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

use std::time::Duration;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

pub use client::{CardStoreClient, ClientError};
pub use error::{AppError, ErrorBody};
pub use routes::cards::SaveReceipt;
pub use state::AppState;

/// Build the full application router with its middleware stack.
///
/// Sentry layers are not included; the binary adds them outermost.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(
            middleware::api_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

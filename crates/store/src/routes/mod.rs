//! HTTP route handlers for the card store.
//!
//! # Route Structure
//!
//! ```text
//! GET     /health                        - Liveness check
//!
//! GET     /api/get-card?id=<id>          - Fetch a stored card
//! POST    /api/save-card                 - Store a card under its `id`
//! OPTIONS /api/get-card, /api/save-card  - CORS preflight (204)
//!
//! # Aliases for pages built against Netlify Functions
//! GET     /.netlify/functions/get-card?id=<id>
//! POST    /.netlify/functions/save-card
//! ```
//!
//! Any other method on a card route answers `405 {"error":"Method not allowed"}`.

pub mod cards;

use axum::{
    Router,
    middleware::from_fn,
    routing::{MethodRouter, get, post},
};

use crate::middleware::{get_card_cors, save_card_cors};
use crate::state::AppState;

/// Path of the fetch operation.
pub const GET_CARD_PATH: &str = "/api/get-card";

/// Path of the save operation.
pub const SAVE_CARD_PATH: &str = "/api/save-card";

const LEGACY_GET_CARD_PATH: &str = "/.netlify/functions/get-card";
const LEGACY_SAVE_CARD_PATH: &str = "/.netlify/functions/save-card";

/// Create the card API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(GET_CARD_PATH, get_card_route())
        .route(SAVE_CARD_PATH, save_card_route())
        .route(LEGACY_GET_CARD_PATH, get_card_route())
        .route(LEGACY_SAVE_CARD_PATH, save_card_route())
}

fn get_card_route() -> MethodRouter<AppState> {
    get(cards::get_card)
        .options(cards::preflight)
        .fallback(cards::method_not_allowed)
        .layer(from_fn(get_card_cors))
}

fn save_card_route() -> MethodRouter<AppState> {
    post(cards::save_card)
        .options(cards::preflight)
        .fallback(cards::method_not_allowed)
        .layer(from_fn(save_card_cors))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the blob store.
async fn health() -> &'static str {
    "ok"
}

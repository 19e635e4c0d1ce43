//! HTTP middleware stack for the card store.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. `TraceLayer` (`http_request` span)
//! 3. Request ID (recorded into the span and Sentry scope)
//! 4. API headers (nosniff, no-store, no-referrer)
//! 5. CORS headers (per route, since allowed methods differ)

pub mod api_headers;
pub mod cors;
pub mod request_id;

pub use api_headers::api_headers_middleware;
pub use cors::{get_card_cors, save_card_cors};
pub use request_id::request_id_middleware;

//! CORS headers for the card routes.
//!
//! Any origin may call the API. The headers go on every response from a card
//! route, errors and preflights included.

use axum::{
    extract::Request,
    http::{
        HeaderMap, HeaderValue,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    middleware::Next,
    response::Response,
};

/// Methods advertised by the get-card route.
pub const GET_CARD_METHODS: &str = "GET, OPTIONS";

/// Methods advertised by the save-card route.
pub const SAVE_CARD_METHODS: &str = "POST, OPTIONS";

/// CORS middleware for `GET /api/get-card`.
pub async fn get_card_cors(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    apply(response.headers_mut(), GET_CARD_METHODS);
    response
}

/// CORS middleware for `POST /api/save-card`.
pub async fn save_card_cors(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    apply(response.headers_mut(), SAVE_CARD_METHODS);
    response
}

fn apply(headers: &mut HeaderMap, methods: &'static str) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(methods),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

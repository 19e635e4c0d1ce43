//! Response headers for a JSON API that is called cross-origin.
//!
//! Browser isolation headers (CSP, COEP, frame options) are left out: these
//! responses are never rendered as documents.

use axum::{
    extract::Request,
    http::{
        HeaderValue,
        header::{CACHE_CONTROL, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS},
    },
    middleware::Next,
    response::Response,
};

/// Add hardening headers to all responses.
///
/// - `X-Content-Type-Options: nosniff`
/// - `Cache-Control: no-store` (a card can be overwritten at any time)
/// - `Referrer-Policy: no-referrer`
pub async fn api_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

    response
}

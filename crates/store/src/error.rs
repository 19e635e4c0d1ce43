//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as the JSON
//! envelope `{"error": "...", "details": "..."}`; server-side failures are
//! captured to Sentry before responding.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Which store operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Fetch,
    Save,
}

impl StoreOp {
    /// Client-facing error message for a failure of this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Fetch => "Failed to fetch card",
            Self::Save => "Failed to save card",
        }
    }
}

/// Application-level error type for the card store.
#[derive(Debug, Error)]
pub enum AppError {
    /// Card id missing or of the wrong length.
    #[error("Invalid card ID: {0}")]
    InvalidId(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Request body exceeds the router's body limit.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// No card stored under the requested id.
    #[error("Card not found")]
    NotFound,

    /// Route exists but not for this method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Store credentials are not configured.
    #[error("Server config missing: {0}")]
    ServerConfigMissing(#[from] ConfigError),

    /// Blob store operation failed.
    #[error("{}: {source}", .op.failure_message())]
    Store {
        op: StoreOp,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    /// Wrap a store failure for the given operation.
    #[must_use]
    pub const fn store(op: StoreOp, source: StoreError) -> Self {
        Self::Store { op, source }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::ServerConfigMissing(_) | Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The client-facing envelope. Never includes credentials.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        match self {
            Self::InvalidId(_) => ErrorBody::new("Invalid card ID"),
            Self::BadRequest(message) => ErrorBody::new(message.as_str()),
            Self::PayloadTooLarge => ErrorBody::new("Request body too large"),
            Self::NotFound => ErrorBody::new("Card not found"),
            Self::MethodNotAllowed => ErrorBody::new("Method not allowed"),
            Self::ServerConfigMissing(_) => ErrorBody::new("Server config missing"),
            Self::Store { op, source } => ErrorBody {
                error: op.failure_message().to_string(),
                details: Some(source.to_string()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (self.status(), Json(self.body())).into_response()
    }
}

/// JSON error envelope shared by every failing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for a store action.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::InvalidId("too short".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::BadRequest("Invalid JSON body".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::PayloadTooLarge),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(get_status(AppError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(AppError::MethodNotAllowed),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            get_status(AppError::ServerConfigMissing(ConfigError::MissingEnvVar(
                "SITE_ID".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::store(StoreOp::Save, StoreError::Timeout)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_envelopes() {
        assert_eq!(
            AppError::InvalidId("card id cannot be empty".to_string()).body(),
            ErrorBody::new("Invalid card ID")
        );
        assert_eq!(
            AppError::ServerConfigMissing(ConfigError::MissingEnvVar(
                "NETLIFY_API_TOKEN".to_string()
            ))
            .body(),
            ErrorBody::new("Server config missing")
        );

        let body = AppError::store(StoreOp::Fetch, StoreError::Status(502)).body();
        assert_eq!(body.error, "Failed to fetch card");
        assert_eq!(
            body.details.as_deref(),
            Some("blob store responded with status 502")
        );
    }

    #[test]
    fn test_envelope_serialization_omits_empty_details() {
        let json = serde_json::to_string(&AppError::NotFound.body()).unwrap();
        assert_eq!(json, r#"{"error":"Card not found"}"#);
    }

    #[test]
    fn test_store_error_display() {
        let err = AppError::store(StoreOp::Save, StoreError::Unreachable);
        assert_eq!(err.to_string(), "Failed to save card: blob store unreachable");
    }
}

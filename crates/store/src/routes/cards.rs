//! Card fetch and save handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{RawQuery, State, rejection::BytesRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use note2u_core::CardId;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

use crate::error::{AppError, Result, StoreOp, add_breadcrumb};
use crate::store::StoreError;
use crate::state::AppState;

/// Response to a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub success: bool,
    pub id: String,
}

/// `GET /api/get-card?id=<id>`
///
/// Returns the stored bytes verbatim, so key order and number spelling
/// survive the round trip. The blob is only checked to be JSON.
#[tracing::instrument(skip_all, fields(card_id = tracing::field::Empty))]
pub async fn get_card(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    let id = first_param(query.as_deref().unwrap_or_default(), "id").unwrap_or_default();
    let id = CardId::parse(&id).map_err(|e| AppError::InvalidId(e.to_string()))?;
    tracing::Span::current().record("card_id", id.as_str());

    let store = state.provider().resolve()?;
    let blob = store
        .get(id.as_str())
        .await
        .map_err(|e| AppError::store(StoreOp::Fetch, e))?
        .ok_or(AppError::NotFound)?;

    serde_json::from_slice::<IgnoredAny>(&blob)
        .map_err(|_| AppError::store(StoreOp::Fetch, StoreError::Corrupt))?;

    tracing::info!(card_id = %id, backend = state.backend(), bytes = blob.len(), "Card fetched");
    let content_type = HeaderValue::from_static("application/json");
    Ok(([(header::CONTENT_TYPE, content_type)], blob).into_response())
}

/// `POST /api/save-card`
///
/// The body must be a JSON object with a 6-character string `id`. The raw
/// body bytes are stored as-is; a second save under the same id replaces
/// the first. Bodies over the router's limit get a `413` envelope.
#[tracing::instrument(skip_all, fields(bytes = tracing::field::Empty))]
pub async fn save_card(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<SaveReceipt>> {
    let body = body.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
        _ => AppError::BadRequest("Invalid JSON body".to_string()),
    })?;
    tracing::Span::current().record("bytes", body.len());

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("Invalid JSON body".to_string()))?;

    let id = payload
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::InvalidId("missing or non-string id".to_string()))?;
    let id = CardId::parse(id).map_err(|e| AppError::InvalidId(e.to_string()))?;

    let store = state.provider().resolve()?;
    store
        .put(id.as_str(), body.to_vec())
        .await
        .map_err(|e| AppError::store(StoreOp::Save, e))?;

    add_breadcrumb("cards", "Card saved", &[("card_id", id.as_str())]);
    tracing::info!(card_id = %id, backend = state.backend(), "Card saved");

    Ok(Json(SaveReceipt {
        success: true,
        id: id.into_inner(),
    }))
}

/// CORS preflight: empty `204`.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Any method a card route does not serve.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// First value of `key` in a raw query string.
fn first_param(query: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

//! HTTP client for a running card store.
//!
//! Used by the `n2u` CLI and the end-to-end tests. One attempt per call,
//! no retries.

use std::time::Duration;

use note2u_core::{CardData, CardId};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::error::ErrorBody;
use crate::routes::cards::SaveReceipt;
use crate::routes::{GET_CARD_PATH, SAVE_CARD_PATH};

/// Errors that can occur when talking to the card store.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No card is stored under the id.
    #[error("Card not found: {0}")]
    NotFound(CardId),

    /// The server answered with an error envelope.
    #[error("API error: {status} - {error}{}", .details.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    Api {
        status: u16,
        error: String,
        details: Option<String>,
    },

    /// The base URL cannot carry API paths.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failed to build the request body or parse the response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for the card store API.
#[derive(Debug, Clone)]
pub struct CardStoreClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CardStoreClient {
    /// Create a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    /// Fetch the stored JSON for `id`, exactly as the server returns it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` on `404` and `ClientError::Api` for any
    /// other error response.
    pub async fn fetch(&self, id: &CardId) -> Result<Value, ClientError> {
        let mut url = self.endpoint(GET_CARD_PATH)?;
        url.query_pairs_mut().append_pair("id", id.as_str());

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id.clone()));
        }
        if !status.is_success() {
            return Err(api_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Fetch `id` and overlay it on the default card.
    ///
    /// # Errors
    ///
    /// Same as [`CardStoreClient::fetch`]; also fails if the stored JSON is
    /// not an object.
    pub async fn fetch_card(&self, id: &CardId) -> Result<CardData, ClientError> {
        let value = self.fetch(id).await?;
        CardData::from_value(&value)
            .ok_or_else(|| ClientError::Parse("stored card is not a JSON object".to_string()))
    }

    /// Save `card` under `id`, replacing whatever was stored there.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` for any error response.
    pub async fn save(&self, card: &CardData, id: &CardId) -> Result<SaveReceipt, ClientError> {
        let mut body =
            serde_json::to_value(card).map_err(|e| ClientError::Parse(e.to_string()))?;
        let Some(object) = body.as_object_mut() else {
            return Err(ClientError::Parse("card did not serialize to an object".to_string()));
        };
        object.insert("id".to_string(), Value::String(id.to_string()));

        let response = self
            .http
            .post(self.endpoint(SAVE_CARD_PATH)?)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }
}

/// Turn an error response into `ClientError::Api`, keeping the envelope when
/// the body has one.
async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => ClientError::Api {
            status,
            error: body.error,
            details: body.details,
        },
        Err(_) => ClientError::Api {
            status,
            error: text,
            details: None,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_resolution() {
        let client = CardStoreClient::new(
            Url::parse("http://localhost:8888/ignored").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(GET_CARD_PATH).unwrap().as_str(),
            "http://localhost:8888/api/get-card"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 500,
            error: "Failed to save card".to_string(),
            details: Some("blob store request timed out".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "API error: 500 - Failed to save card (blob store request timed out)"
        );

        let err = ClientError::Api {
            status: 400,
            error: "Invalid card ID".to_string(),
            details: None,
        };
        assert_eq!(err.to_string(), "API error: 400 - Invalid card ID");
    }
}

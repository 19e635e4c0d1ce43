//! Card ⇄ share-token codec.
//!
//! ```text
//! encode: CardData → JSON → percent-escape → base64 → Token
//! decode: Token → base64 → percent-unescape → JSON object → overlay on defaults
//! ```
//!
//! The scheme matches `btoa(encodeURIComponent(JSON.stringify(card)))` in the
//! browser, so tokens minted by either side decode on the other. There is no
//! compression or encryption: anyone holding a token can read the card.

use core::fmt;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, STANDARD};
use base64::engine::{DecodePaddingMode, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::CardData;

/// Accepts standard-alphabet input with or without `=` padding.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Accepts URL-safe-alphabet input with or without `=` padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors that can occur when decoding a token.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The token is empty.
    #[error("token is empty")]
    Empty,

    /// The token is not valid base64 in either alphabet.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not UTF-8.
    #[error("decoded token is not UTF-8")]
    Utf8,

    /// The percent-escaped text contains an invalid escape sequence.
    #[error("invalid escape sequence in token")]
    Escape,

    /// The unescaped text is not JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is valid but not an object.
    #[error("token does not contain a card object")]
    NotAnObject,
}

/// An opaque share token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap an existing token string without checking it.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Token` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encode a card into a share token.
///
/// Empty text fields are replaced with their defaults first, the same way
/// the share link does, so `decode(encode(card))` returns the normalized
/// card.
#[must_use]
pub fn encode(card: &CardData) -> Token {
    let normalized = card.clone().normalized();
    // A struct of strings, numbers and vectors cannot fail to serialize
    let json = serde_json::to_string(&normalized).unwrap_or_else(|_| String::from("{}"));
    let escaped = urlencoding::encode(&json);
    Token(STANDARD.encode(escaped.as_bytes()))
}

/// Decode a share token into a card.
///
/// Keys missing from the token keep their default values.
///
/// # Errors
///
/// Returns `DecodeError` if the token is empty, is not base64, does not
/// unescape to UTF-8 text, is not JSON, or is not a JSON object.
pub fn decode(token: &str) -> Result<CardData, DecodeError> {
    let bytes = decode_base64(token)?;
    let escaped = String::from_utf8(bytes).map_err(|_| DecodeError::Utf8)?;
    check_escapes(&escaped)?;
    let json = urlencoding::decode(&escaped).map_err(|_| DecodeError::Escape)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    CardData::from_value(&value).ok_or(DecodeError::NotAnObject)
}

/// Decode a share token, substituting the all-defaults card on failure.
#[must_use]
pub fn decode_or_default(token: &str) -> CardData {
    decode(token).unwrap_or_default()
}

/// Every `%` must start a two-hex-digit escape. `urlencoding` passes
/// malformed ones through as literal text.
fn check_escapes(escaped: &str) -> Result<(), DecodeError> {
    let bytes = escaped.as_bytes();
    for (i, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'%') {
        let hex = |offset: usize| bytes.get(i + offset).is_some_and(u8::is_ascii_hexdigit);
        if !(hex(1) && hex(2)) {
            return Err(DecodeError::Escape);
        }
    }
    Ok(())
}

/// Strip whitespace, undo `+` → space damage from form decoding, then try
/// the standard alphabet followed by the URL-safe one.
fn decode_base64(token: &str) -> Result<Vec<u8>, DecodeError> {
    let cleaned: String = token
        .trim()
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(DecodeError::Empty);
    }

    STANDARD_LENIENT
        .decode(cleaned.as_bytes())
        .or_else(|_| URL_SAFE_LENIENT.decode(cleaned.as_bytes()))
        .map_err(DecodeError::from)
}

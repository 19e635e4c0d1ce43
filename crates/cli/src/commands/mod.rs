//! Subcommand implementations.
//!
//! Each command writes its result to the given writer; progress and warnings
//! go through `tracing`.

pub mod codec;
pub mod remote;

use std::io::Read;
use std::path::Path;

use note2u_core::{CardData, CardIdError};
use note2u_store::ClientError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid card JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Card JSON must be an object")]
    NotAnObject,

    #[error("Invalid card id: {0}")]
    CardId(#[from] CardIdError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Read command input from `file`, or stdin when no file is given.
pub fn read_input(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Parse card JSON, overlaying it on the default card.
pub fn parse_card(input: &str) -> Result<CardData, CliError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    CardData::from_value(&value).ok_or(CliError::NotAnObject)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use note2u_core::defaults;

    use super::*;

    #[test]
    fn test_parse_card_overlays_defaults() {
        let card = parse_card(r#"{"to":"Sam","message":"Hi"}"#).unwrap();
        assert_eq!(card.to, "Sam");
        assert_eq!(card.msg, "Hi");
        assert_eq!(card.from, defaults::FROM);
    }

    #[test]
    fn test_parse_card_rejects_non_objects() {
        assert!(matches!(parse_card("[1,2]"), Err(CliError::NotAnObject)));
        assert!(matches!(parse_card("{oops"), Err(CliError::Json(_))));
    }
}

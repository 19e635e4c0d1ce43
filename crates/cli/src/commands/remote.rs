//! `save` and `fetch` commands against a running card store.

use std::io::Write;
use std::time::Duration;

use note2u_core::CardId;
use note2u_store::CardStoreClient;
use url::Url;

use super::{CliError, parse_card};

/// POST the card JSON in `input` under `id` (generated when `None`) and
/// print the stored id.
pub async fn save(
    server: &Url,
    timeout: Duration,
    input: &str,
    id: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let card = parse_card(input)?;
    let id = match id {
        Some(id) => CardId::parse(id)?,
        None => CardId::generate(),
    };

    let client = CardStoreClient::new(server.clone(), timeout)?;
    let receipt = client.save(&card, &id).await?;
    tracing::info!(card_id = %receipt.id, server = %server, "Card saved");

    writeln!(out, "{}", receipt.id)?;
    Ok(())
}

/// GET the card stored under `id` and print it as pretty JSON.
pub async fn fetch(
    server: &Url,
    timeout: Duration,
    id: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = CardId::parse(id)?;

    let client = CardStoreClient::new(server.clone(), timeout)?;
    let card = client.fetch(&id).await?;
    tracing::debug!(card_id = %id, "Card fetched");

    writeln!(out, "{}", serde_json::to_string_pretty(&card)?)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn server() -> Url {
        Url::parse("http://127.0.0.1:9").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_validates_id_before_connecting() {
        let mut out = Vec::new();
        let err = fetch(&server(), Duration::from_secs(1), "abc", &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::CardId(_)));
    }

    #[tokio::test]
    async fn test_save_validates_input_before_connecting() {
        let mut out = Vec::new();
        let err = save(&server(), Duration::from_secs(1), "[]", None, &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::NotAnObject));

        let err = save(
            &server(),
            Duration::from_secs(1),
            "{}",
            Some("toolong"),
            &mut out,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::CardId(_)));
        assert!(out.is_empty());
    }
}

//! `encode` and `decode` commands.

use std::io::Write;

use note2u_core::share::{self, ViewerLoad};
use note2u_core::{CardData, codec};
use url::Url;

use super::{CliError, parse_card};

/// Print the token for the card JSON in `input`, or a share URL on `base_url`.
pub fn encode(input: &str, base_url: Option<&Url>, out: &mut impl Write) -> Result<(), CliError> {
    let card = parse_card(input)?;

    match base_url {
        Some(base) => writeln!(out, "{}", share::share_url(base, &card))?,
        None => writeln!(out, "{}", codec::encode(&card))?,
    }
    Ok(())
}

/// Print the card carried by a token or share URL as pretty JSON.
///
/// Unreadable input prints the default card, matching what a viewer shows.
pub fn decode(token_or_url: &str, out: &mut impl Write) -> Result<(), CliError> {
    let card = resolve(token_or_url.trim());
    writeln!(out, "{}", serde_json::to_string_pretty(&card)?)?;
    Ok(())
}

fn resolve(input: &str) -> CardData {
    let load = match Url::parse(input) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => ViewerLoad::from_url(&url),
        _ => match codec::decode(input) {
            Ok(card) => ViewerLoad::Shared(card),
            Err(e) => ViewerLoad::Invalid(e),
        },
    };

    match &load {
        ViewerLoad::Invalid(e) => tracing::warn!(error = %e, "Invalid card data, showing defaults"),
        ViewerLoad::Blank => tracing::warn!("No card in URL, showing defaults"),
        ViewerLoad::Shared(_) | ViewerLoad::Flat(_) => {}
    }

    load.into_card()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use note2u_core::defaults;

    use super::*;

    fn run_encode(input: &str, base: Option<&Url>) -> String {
        let mut out = Vec::new();
        encode(input, base, &mut out).unwrap();
        String::from_utf8(out).unwrap().trim_end().to_string()
    }

    fn run_decode(input: &str) -> serde_json::Value {
        let mut out = Vec::new();
        decode(input, &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn test_encode_then_decode_token() {
        let token = run_encode(r#"{"to":"Sam","from":"Lee"}"#, None);
        let card = run_decode(&token);
        assert_eq!(card["to"], "Sam");
        assert_eq!(card["from"], "Lee");
    }

    #[test]
    fn test_encode_share_url() {
        let base = Url::parse("https://note2u.example/").unwrap();
        let link = run_encode(r#"{"to":"Sam"}"#, Some(&base));
        assert!(link.starts_with("https://note2u.example/?card="));

        assert_eq!(run_decode(&link)["to"], "Sam");
    }

    #[test]
    fn test_decode_flat_url() {
        let card = run_decode("https://note2u.example/?to=Ana&msg=Hello");
        assert_eq!(card["to"], "Ana");
        assert_eq!(card["msg"], "Hello");
        assert_eq!(card["from"], defaults::FROM);
    }

    #[test]
    fn test_decode_garbage_prints_defaults() {
        let card = run_decode("!!! not a token !!!");
        assert_eq!(card["to"], defaults::TO);
        assert_eq!(card["theme"], "classic");
    }

    #[test]
    fn test_encode_rejects_bad_json() {
        let mut out = Vec::new();
        assert!(encode("not json", None, &mut out).is_err());
        assert!(out.is_empty());
    }
}

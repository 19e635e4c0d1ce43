//! Share links and viewer-mode URL parsing.
//!
//! A shared card lives entirely in its URL:
//!
//! ```text
//! <origin><path>?card=<token>
//! ```
//!
//! Older links carry the fields as flat parameters instead
//! (`?to=Sam&from=Lee&msg=...`); [`ViewerLoad::from_url`] accepts both.

use url::Url;
use url::form_urlencoded;

use crate::codec::{self, DecodeError};
use crate::types::{CardData, CardPatch};

/// Query parameter carrying the encoded card.
pub const CARD_PARAM: &str = "card";

/// Build the share URL for `card` on top of the page it was created on.
///
/// Any existing query string or fragment on `base` is dropped.
#[must_use]
pub fn share_url(base: &Url, card: &CardData) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut()
        .append_pair(CARD_PARAM, codec::encode(card).as_str());
    url
}

/// Message body used by share targets (SMS, messengers, native share).
#[must_use]
pub fn share_text(card: &CardData) -> String {
    format!("{} sent you a Valentine's card! 💕", sender(card))
}

/// Subject line used by email and native share titles.
#[must_use]
pub fn share_subject(card: &CardData) -> String {
    format!("Valentine's Card from {}", sender(card))
}

/// Email body with the link on its own line.
#[must_use]
pub fn share_email_body(card: &CardData, link: &Url) -> String {
    format!("{}\n\nOpen your card here:\n{link}", share_text(card))
}

fn sender(card: &CardData) -> &str {
    if card.from.is_empty() {
        crate::types::defaults::FROM
    } else {
        &card.from
    }
}

/// What a viewer page should display for the URL it was opened with.
#[derive(Debug)]
pub enum ViewerLoad {
    /// No card parameters: show the editor with defaults.
    Blank,
    /// A `card` token decoded successfully.
    Shared(CardData),
    /// Flat named parameters, overlaid on the defaults.
    Flat(CardData),
    /// A `card` token was present but unreadable. The viewer shows the
    /// defaults and a soft notice instead of failing.
    Invalid(DecodeError),
}

impl ViewerLoad {
    /// Inspect a full viewer URL.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self::from_pairs(url.query_pairs())
    }

    /// Inspect a raw query string (without the leading `?`).
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        Self::from_pairs(form_urlencoded::parse(query.trim_start_matches('?').as_bytes()))
    }

    fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned()))
            .collect();

        if let Some((_, token)) = pairs
            .iter()
            .find(|(k, v)| k == CARD_PARAM && !v.is_empty())
        {
            return match codec::decode(token) {
                Ok(card) => Self::Shared(card),
                Err(e) => Self::Invalid(e),
            };
        }

        let patch = CardPatch::from_pairs(pairs);
        if patch.is_empty() {
            Self::Blank
        } else {
            Self::Flat(patch.apply(CardData::default()))
        }
    }

    /// Whether the page was opened from a shared link (valid or not).
    #[must_use]
    pub const fn is_viewer(&self) -> bool {
        !matches!(self, Self::Blank)
    }

    /// Toast shown after loading, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Blank => None,
            Self::Shared(_) | Self::Flat(_) => Some("💌 Viewing shared card!"),
            Self::Invalid(_) => Some("Invalid card data"),
        }
    }

    /// The card to display; defaults for `Blank` and `Invalid`.
    #[must_use]
    pub fn into_card(self) -> CardData {
        match self {
            Self::Shared(card) | Self::Flat(card) => card,
            Self::Blank | Self::Invalid(_) => CardData::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Side, Sticker, defaults};

    fn base() -> Url {
        Url::parse("https://note2u.example/create?draft=1#top").unwrap()
    }

    #[test]
    fn test_share_url_shape() {
        let url = share_url(&base(), &CardData::default());
        assert_eq!(url.origin().ascii_serialization(), "https://note2u.example");
        assert_eq!(url.path(), "/create");
        assert!(url.fragment().is_none());

        let params: Vec<_> = url.query_pairs().collect();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].0, CARD_PARAM);
    }

    #[test]
    fn test_share_url_round_trips_through_viewer() {
        let card = CardData {
            to: "Sam".to_string(),
            from: "Lee".to_string(),
            msg: "First line\nSecond line 💕".to_string(),
            stickers: vec![Sticker::new("🌹", 33.3, 66.6, Side::Back)],
            ..CardData::default()
        };
        let url = share_url(&base(), &card);

        match ViewerLoad::from_url(&url) {
            ViewerLoad::Shared(decoded) => assert_eq!(decoded, card),
            other => panic!("expected shared card, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_token_with_plus_survives_form_decoding() {
        // Browsers build the link without escaping the token
        let card = CardData {
            to: "Zoë ✨ >>> ???".to_string(),
            ..CardData::default()
        };
        let token = codec::encode(&card);
        let query = format!("card={token}");

        let load = ViewerLoad::from_query(&query);
        assert_eq!(load.into_card(), card);
    }

    #[test]
    fn test_invalid_token_yields_defaults_and_notice() {
        let load = ViewerLoad::from_query("?card=%%%definitely-not-a-card");
        assert!(matches!(load, ViewerLoad::Invalid(_)));
        assert!(load.is_viewer());
        assert_eq!(load.notice(), Some("Invalid card data"));
        assert_eq!(load.into_card(), CardData::default());
    }

    #[test]
    fn test_flat_parameters() {
        let load = ViewerLoad::from_query("to=Sam&message=Hi%0Athere&theme=midnight");
        assert!(matches!(load, ViewerLoad::Flat(_)));
        let card = load.into_card();
        assert_eq!(card.to, "Sam");
        assert_eq!(card.msg, "Hi\nthere");
        assert_eq!(card.theme.as_str(), "midnight");
        assert_eq!(card.from, defaults::FROM);
    }

    #[test]
    fn test_card_param_wins_over_flat_parameters() {
        let card = CardData {
            to: "Token".to_string(),
            ..CardData::default()
        };
        let query = format!("to=Flat&card={}", codec::encode(&card));
        assert_eq!(ViewerLoad::from_query(&query).into_card().to, "Token");
    }

    #[test]
    fn test_blank_url() {
        let load = ViewerLoad::from_url(&Url::parse("https://note2u.example/").unwrap());
        assert!(matches!(load, ViewerLoad::Blank));
        assert!(!load.is_viewer());
        assert_eq!(load.notice(), None);

        let load = ViewerLoad::from_query("card=&utm_source=sms");
        assert!(matches!(load, ViewerLoad::Blank));
    }

    #[test]
    fn test_share_text() {
        let card = CardData {
            from: "Lee".to_string(),
            ..CardData::default()
        };
        assert_eq!(share_text(&card), "Lee sent you a Valentine's card! 💕");
        assert_eq!(share_subject(&card), "Valentine's Card from Lee");

        let link = Url::parse("https://note2u.example/?card=abc").unwrap();
        let body = share_email_body(&card, &link);
        assert!(body.ends_with("Open your card here:\nhttps://note2u.example/?card=abc"));
    }

    #[test]
    fn test_share_text_with_empty_sender() {
        let card = CardData {
            from: String::new(),
            ..CardData::default()
        };
        assert_eq!(share_subject(&card), "Valentine's Card from Someone Special");
    }
}

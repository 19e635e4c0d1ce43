//! Card identifier type.

use core::fmt;

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`CardId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CardIdError {
    /// The input string is empty.
    #[error("card id cannot be empty")]
    Empty,
    /// The input string has the wrong number of characters.
    #[error("card id must be exactly {expected} characters (got {actual})")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },
}

/// A card identifier, used as the blob store key.
///
/// The id is opaque: the only constraint is its length.
///
/// ## Constraints
///
/// - Exactly 6 UTF-16 code units, the length a browser reports
///
/// ## Examples
///
/// ```
/// use note2u_core::CardId;
///
/// assert!(CardId::parse("abc123").is_ok());
/// assert!(CardId::parse("abcde").is_err());   // too short
/// assert!(CardId::parse("abcdefg").is_err()); // too long
/// assert!(CardId::parse("").is_err());        // empty
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Number of UTF-16 code units in every card id.
    pub const LENGTH: usize = 6;

    /// Parse a `CardId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or is not exactly
    /// [`CardId::LENGTH`] UTF-16 code units long.
    pub fn parse(s: &str) -> Result<Self, CardIdError> {
        if s.is_empty() {
            return Err(CardIdError::Empty);
        }

        let actual = s.encode_utf16().count();
        if actual != Self::LENGTH {
            return Err(CardIdError::WrongLength {
                expected: Self::LENGTH,
                actual,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Generate a random alphanumeric id.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    /// Generate a random alphanumeric id from the given RNG.
    #[must_use]
    pub fn generate_with<R: Rng>(rng: &mut R) -> Self {
        let id = rng
            .sample_iter(Alphanumeric)
            .take(Self::LENGTH)
            .map(char::from)
            .collect();
        Self(id)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `CardId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CardId {
    type Err = CardIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CardId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

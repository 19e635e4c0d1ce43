//! The card model and its partial-overlay decoding.
//!
//! Cards travel as JSON objects. Decoding never replaces a default with an
//! absent or empty value: only a fixed set of top-level keys is recognized,
//! each is optional, and anything else is ignored.
//!
//! # Wire keys
//!
//! ```text
//! to                         - recipient
//! from                       - sender
//! front | frontMessage | title - front-of-card headline
//! msg   | message            - inside message (may contain \n)
//! sign  | signOff            - sign-off line
//! theme                      - palette key
//! font, color                - presentation overrides
//! stickers                   - [{emoji, x, y, side}]
//! ```
//!
//! Serialization always uses the first (short) key of each group.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::theme::ThemeKey;

/// Fallback values used whenever a field is absent or empty.
pub mod defaults {
    /// Recipient shown when none is given.
    pub const TO: &str = "My Love";
    /// Sender shown when none is given.
    pub const FROM: &str = "Someone Special";
    /// Front-of-card headline.
    pub const FRONT: &str = "Will You Be My Valentine?";
    /// Inside message.
    pub const MESSAGE: &str = "Every moment with you is magical.";
    /// Sign-off line above the sender.
    pub const SIGN_OFF: &str = "Forever Yours,";
    /// Sticker coordinate used when a stored sticker lacks one.
    pub const STICKER_COORD: f64 = 50.0;
}

const TO_KEYS: &[&str] = &["to"];
const FROM_KEYS: &[&str] = &["from"];
const FRONT_KEYS: &[&str] = &["front", "frontMessage", "title"];
const MESSAGE_KEYS: &[&str] = &["msg", "message"];
const SIGN_OFF_KEYS: &[&str] = &["sign", "signOff"];
const THEME_KEYS: &[&str] = &["theme"];
const FONT_KEYS: &[&str] = &["font"];
const COLOR_KEYS: &[&str] = &["color"];

/// Which face of the card a sticker sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
}

impl Side {
    /// Parse a side, treating anything other than `"back"` as the front.
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        if s == "back" { Self::Back } else { Self::Front }
    }

    /// The opposite face.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

impl<'de> Deserialize<'de> for Side {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_str_lossy(&s))
    }
}

/// A decorative emoji placed on the card.
///
/// `x` and `y` are percentages of the card face. They are kept exactly as
/// produced; renderers clamp them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sticker {
    pub emoji: String,
    pub x: f64,
    pub y: f64,
    pub side: Side,
}

impl Sticker {
    /// Create a sticker at the given position.
    #[must_use]
    pub fn new(emoji: impl Into<String>, x: f64, y: f64, side: Side) -> Self {
        Self {
            emoji: emoji.into(),
            x,
            y,
            side,
        }
    }

    /// Read a sticker from loosely-typed JSON.
    ///
    /// Returns `None` unless the value is an object with a non-empty string
    /// `emoji`. Missing or non-numeric coordinates fall back to the centre.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let emoji = obj.get("emoji")?.as_str().filter(|e| !e.is_empty())?;
        let coord = |key: &str| {
            obj.get(key)
                .and_then(Value::as_f64)
                .unwrap_or(defaults::STICKER_COORD)
        };
        let side = obj
            .get("side")
            .and_then(Value::as_str)
            .map(Side::from_str_lossy)
            .unwrap_or_default();

        Some(Self::new(emoji, coord("x"), coord("y"), side))
    }
}

/// A fully-resolved card.
///
/// Every text field holds a display value; `Default` yields the all-defaults
/// card a viewer falls back to when a shared link cannot be read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardData {
    pub to: String,
    pub from: String,
    pub front: String,
    pub msg: String,
    pub sign: String,
    pub theme: ThemeKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stickers: Vec<Sticker>,
}

impl Default for CardData {
    fn default() -> Self {
        Self {
            to: defaults::TO.to_string(),
            from: defaults::FROM.to_string(),
            front: defaults::FRONT.to_string(),
            msg: defaults::MESSAGE.to_string(),
            sign: defaults::SIGN_OFF.to_string(),
            theme: ThemeKey::default(),
            font: None,
            color: None,
            stickers: Vec::new(),
        }
    }
}

impl CardData {
    /// Build a card from a JSON value by overlaying recognized keys onto the
    /// defaults.
    ///
    /// Returns `None` if the value is not a JSON object.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        value
            .as_object()
            .map(|obj| CardPatch::from_object(obj).apply(Self::default()))
    }

    /// Replace empty text fields with their defaults.
    ///
    /// Cards built by hand may carry empty strings; this is the form that
    /// gets shared, so a decoded card compares equal to it.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        fill_empty(&mut self.to, defaults::TO);
        fill_empty(&mut self.from, defaults::FROM);
        fill_empty(&mut self.front, defaults::FRONT);
        fill_empty(&mut self.msg, defaults::MESSAGE);
        fill_empty(&mut self.sign, defaults::SIGN_OFF);
        if self.theme.as_str().is_empty() {
            self.theme = ThemeKey::default();
        }
        self.font = self.font.filter(|f| !f.is_empty());
        self.color = self.color.filter(|c| !c.is_empty());
        self
    }
}

fn fill_empty(field: &mut String, default: &str) {
    if field.is_empty() {
        default.clone_into(field);
    }
}

impl<'de> Deserialize<'de> for CardData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).ok_or_else(|| de::Error::custom("card data must be a JSON object"))
    }
}

/// The recognized, present, non-empty keys of a decoded card object.
///
/// Applying a patch overwrites only the fields it carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardPatch {
    pub to: Option<String>,
    pub from: Option<String>,
    pub front: Option<String>,
    pub msg: Option<String>,
    pub sign: Option<String>,
    pub theme: Option<String>,
    pub font: Option<String>,
    pub color: Option<String>,
    pub stickers: Option<Vec<Sticker>>,
}

impl CardPatch {
    /// Extract a patch from a JSON object, ignoring unknown keys.
    #[must_use]
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        let text = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
                .map(str::to_owned)
        };

        let stickers = obj
            .get("stickers")
            .and_then(Value::as_array)
            .filter(|list| !list.is_empty())
            .map(|list| list.iter().filter_map(Sticker::from_value).collect());

        Self {
            to: text(TO_KEYS),
            from: text(FROM_KEYS),
            front: text(FRONT_KEYS),
            msg: text(MESSAGE_KEYS),
            sign: text(SIGN_OFF_KEYS),
            theme: text(THEME_KEYS),
            font: text(FONT_KEYS),
            color: text(COLOR_KEYS),
            stickers,
        }
    }

    /// Extract a patch from flat `key=value` pairs, such as a viewer URL
    /// that carries `?to=...&from=...` instead of a token.
    ///
    /// The first non-empty occurrence of a key wins. Stickers cannot be
    /// expressed this way.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut obj = Map::new();
        for (key, value) in pairs {
            let value: String = value.into();
            if value.is_empty() || obj.contains_key(key.as_ref()) {
                continue;
            }
            obj.insert(key.as_ref().to_owned(), Value::String(value));
        }
        obj.remove("stickers");
        Self::from_object(&obj)
    }

    /// Whether the patch carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay this patch onto `base`.
    #[must_use]
    pub fn apply(self, mut base: CardData) -> CardData {
        if let Some(to) = self.to {
            base.to = to;
        }
        if let Some(from) = self.from {
            base.from = from;
        }
        if let Some(front) = self.front {
            base.front = front;
        }
        if let Some(msg) = self.msg {
            base.msg = msg;
        }
        if let Some(sign) = self.sign {
            base.sign = sign;
        }
        if let Some(theme) = self.theme {
            base.theme = ThemeKey::new(theme);
        }
        if let Some(font) = self.font {
            base.font = Some(font);
        }
        if let Some(color) = self.color {
            base.color = Some(color);
        }
        if let Some(stickers) = self.stickers {
            base.stickers = stickers;
        }
        base
    }
}

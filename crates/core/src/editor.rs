//! Editor state for the card creator.
//!
//! The whole editor is one immutable [`CardState`]. Every UI event becomes an
//! [`Action`], [`update`] returns the next state, and the renderer reads the
//! derived [`CardView`]. No widget holds state of its own.
//!
//! ```rust
//! use note2u_core::editor::{Action, CardState, update};
//!
//! let state = CardState::default();
//! let state = update(&state, Action::SetTo("Sam".into())).unwrap();
//! let state = update(&state, Action::Flip).unwrap();
//!
//! assert_eq!(state.view().recipient, "Sam");
//! assert!(state.view().flipped);
//! ```

use rand::Rng;
use thiserror::Error;

use crate::types::{CardData, Palette, Side, Sticker, ThemeKey, defaults};

/// Largest photo accepted by [`Action::AttachPhoto`], in bytes.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Placeholder shown for an empty sender field while editing.
pub const SENDER_PLACEHOLDER: &str = "Your Name";

/// Placeholder shown for an empty inside message while editing.
pub const MESSAGE_PLACEHOLDER: &str = "Your sweet message here...";

/// Random stickers land inside `[PLACEMENT_MIN, PLACEMENT_MIN + PLACEMENT_SPAN)`
/// on both axes so they never hang off the card edge.
const PLACEMENT_MIN: f64 = 10.0;
const PLACEMENT_SPAN: f64 = 70.0;

/// A ready-made front headline and inside message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickMessage {
    pub front: &'static str,
    pub message: &'static str,
}

/// Presets offered by the quick-message picker.
pub const QUICK_MESSAGES: &[QuickMessage] = &[
    QuickMessage {
        front: "Will You Be My Valentine?",
        message: "Every moment with you is magical.",
    },
    QuickMessage {
        front: "You Make My Heart Smile",
        message: "Thank you for being my favorite person.\nToday and every day.",
    },
    QuickMessage {
        front: "Happy Valentine's Day!",
        message: "Life is sweeter with you in it.",
    },
    QuickMessage {
        front: "To My Best Friend",
        message: "Roses are red,\nviolets are blue,\nI'm lucky to have\na friend like you.",
    },
];

/// Errors produced by rejected editor actions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The uploaded file is not an image.
    #[error("Please select an image (got {0})")]
    NotAnImage(String),

    /// The uploaded image exceeds [`MAX_PHOTO_BYTES`].
    #[error("Image too large (max {max} bytes, got {size})")]
    PhotoTooLarge {
        /// Size of the rejected file.
        size: usize,
        /// Maximum accepted size.
        max: usize,
    },

    /// A sticker needs a non-empty emoji.
    #[error("sticker emoji cannot be empty")]
    EmptySticker,
}

/// A photo attached to the card, kept as a data URL.
///
/// Photos stay local to the editor: they are never part of a share token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub mime: String,
    pub data_url: String,
}

/// Everything the user has entered so far.
///
/// Text fields hold exactly what was typed, including the empty string;
/// defaults are applied only when deriving a [`CardData`] or [`CardView`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardState {
    pub to: String,
    pub from: String,
    pub front: String,
    pub message: String,
    pub sign_off: String,
    pub theme: ThemeKey,
    pub font: Option<String>,
    pub color: Option<String>,
    pub photo: Option<Photo>,
    pub stickers: Vec<Sticker>,
    pub flipped: bool,
}

/// A single editor event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetTo(String),
    SetFrom(String),
    SetFront(String),
    SetMessage(String),
    SetSignOff(String),
    SetTheme(ThemeKey),
    SetFont(Option<String>),
    SetColor(Option<String>),
    /// Fill the front headline and/or inside message from a preset.
    ApplyQuickMessage {
        front: Option<String>,
        message: Option<String>,
    },
    /// Attach an uploaded photo. `size` is the original file size.
    AttachPhoto {
        mime: String,
        size: usize,
        data_url: String,
    },
    RemovePhoto,
    /// Place a sticker on the side currently facing the user.
    AddSticker { emoji: String, x: f64, y: f64 },
    /// Remove the first sticker matching emoji and position.
    RemoveSticker { emoji: String, x: f64, y: f64 },
    ClearStickers,
    Flip,
    /// Replace the editable fields with a decoded card.
    Load(CardData),
}

impl Action {
    /// An [`Action::AddSticker`] at a random position inside the safe area.
    #[must_use]
    pub fn place_sticker<R: Rng>(emoji: impl Into<String>, rng: &mut R) -> Self {
        Self::AddSticker {
            emoji: emoji.into(),
            x: PLACEMENT_MIN + rng.random::<f64>() * PLACEMENT_SPAN,
            y: PLACEMENT_MIN + rng.random::<f64>() * PLACEMENT_SPAN,
        }
    }

    /// An [`Action::ApplyQuickMessage`] for a preset.
    #[must_use]
    pub fn quick_message(preset: &QuickMessage) -> Self {
        Self::ApplyQuickMessage {
            front: Some(preset.front.to_string()),
            message: Some(preset.message.to_string()),
        }
    }
}

/// Compute the state that follows `state` after `action`.
///
/// # Errors
///
/// Returns `EditError` when a photo is not an image or is too large, or when
/// a sticker has no emoji. The input state is never modified.
pub fn update(state: &CardState, action: Action) -> Result<CardState, EditError> {
    let mut next = state.clone();

    match action {
        Action::SetTo(to) => next.to = to,
        Action::SetFrom(from) => next.from = from,
        Action::SetFront(front) => next.front = front,
        Action::SetMessage(message) => next.message = message,
        Action::SetSignOff(sign_off) => next.sign_off = sign_off,
        Action::SetTheme(theme) => next.theme = theme,
        Action::SetFont(font) => next.font = font.filter(|f| !f.is_empty()),
        Action::SetColor(color) => next.color = color.filter(|c| !c.is_empty()),
        Action::ApplyQuickMessage { front, message } => {
            if let Some(front) = front.filter(|f| !f.is_empty()) {
                next.front = front;
            }
            if let Some(message) = message.filter(|m| !m.is_empty()) {
                next.message = message;
            }
        }
        Action::AttachPhoto {
            mime,
            size,
            data_url,
        } => {
            if !mime.starts_with("image/") {
                return Err(EditError::NotAnImage(mime));
            }
            if size > MAX_PHOTO_BYTES {
                return Err(EditError::PhotoTooLarge {
                    size,
                    max: MAX_PHOTO_BYTES,
                });
            }
            next.photo = Some(Photo { mime, data_url });
        }
        Action::RemovePhoto => next.photo = None,
        Action::AddSticker { emoji, x, y } => {
            if emoji.is_empty() {
                return Err(EditError::EmptySticker);
            }
            let side = if state.flipped { Side::Back } else { Side::Front };
            next.stickers.push(Sticker::new(emoji, x, y, side));
        }
        Action::RemoveSticker { emoji, x, y } => {
            if let Some(idx) = next
                .stickers
                .iter()
                .position(|s| s.emoji == emoji && same_position(s, x, y))
            {
                next.stickers.remove(idx);
            }
        }
        Action::ClearStickers => next.stickers.clear(),
        Action::Flip => next.flipped = !next.flipped,
        Action::Load(card) => {
            next = CardState {
                to: card.to,
                from: card.from,
                front: card.front,
                message: card.msg,
                sign_off: card.sign,
                theme: card.theme,
                font: card.font,
                color: card.color,
                photo: None,
                stickers: card.stickers,
                flipped: false,
            };
        }
    }

    Ok(next)
}

// Stickers are matched on the exact coordinates they were stored with
#[allow(clippy::float_cmp)]
fn same_position(sticker: &Sticker, x: f64, y: f64) -> bool {
    sticker.x == x && sticker.y == y
}

/// A sticker positioned for rendering, coordinates clamped to the card.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSticker {
    pub emoji: String,
    /// Left offset in percent, within `[0, 100]`.
    pub left: f64,
    /// Top offset in percent, within `[0, 100]`.
    pub top: f64,
}

impl PlacedSticker {
    fn from_sticker(sticker: &Sticker) -> Self {
        Self {
            emoji: sticker.emoji.clone(),
            left: clamp_percent(sticker.x),
            top: clamp_percent(sticker.y),
        }
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        defaults::STICKER_COORD
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Everything a renderer needs, derived from a [`CardState`].
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    /// Name on the envelope and inside greeting.
    pub recipient: String,
    pub sender: String,
    pub front: String,
    /// Inside message split at newlines; each entry is one rendered line.
    pub message_lines: Vec<String>,
    pub sign_off: String,
    pub palette: &'static Palette,
    pub font: String,
    pub color: String,
    pub photo: Option<String>,
    pub front_stickers: Vec<PlacedSticker>,
    pub back_stickers: Vec<PlacedSticker>,
    pub flipped: bool,
    /// Hint under the card preview.
    pub hint: &'static str,
}

impl CardState {
    /// The card as it will be shared: empty fields replaced by defaults.
    #[must_use]
    pub fn to_card(&self) -> CardData {
        CardData {
            to: self.to.clone(),
            from: self.from.clone(),
            front: self.front.clone(),
            msg: self.message.clone(),
            sign: self.sign_off.clone(),
            theme: self.theme.clone(),
            font: self.font.clone(),
            color: self.color.clone(),
            stickers: self.stickers.clone(),
        }
        .normalized()
    }

    /// Derive the preview.
    #[must_use]
    pub fn view(&self) -> CardView {
        let palette = self.theme.palette();
        let message = or_default(&self.message, MESSAGE_PLACEHOLDER);

        let placed = |side: Side| {
            self.stickers
                .iter()
                .filter(|s| s.side == side)
                .map(PlacedSticker::from_sticker)
                .collect()
        };

        CardView {
            recipient: or_default(&self.to, defaults::TO).to_owned(),
            sender: or_default(&self.from, SENDER_PLACEHOLDER).to_owned(),
            front: or_default(&self.front, defaults::FRONT).to_owned(),
            message_lines: message.split('\n').map(str::to_owned).collect(),
            sign_off: or_default(&self.sign_off, defaults::SIGN_OFF).to_owned(),
            palette,
            font: self
                .font
                .clone()
                .unwrap_or_else(|| palette.font.to_owned()),
            color: self
                .color
                .clone()
                .unwrap_or_else(|| palette.text.to_owned()),
            photo: self.photo.as_ref().map(|p| p.data_url.clone()),
            front_stickers: placed(Side::Front),
            back_stickers: placed(Side::Back),
            flipped: self.flipped,
            hint: if self.flipped {
                "Tap to see front"
            } else {
                "Tap card to flip"
            },
        }
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

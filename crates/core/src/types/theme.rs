//! Theme keys and the fixed palette table.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Colors and typography applied to a card when a theme is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Theme key as it appears in card data.
    pub key: &'static str,
    /// Human readable name for theme pickers.
    pub label: &'static str,
    /// Page background (CSS color or gradient).
    pub background: &'static str,
    /// Card face color.
    pub card: &'static str,
    /// Primary text color.
    pub text: &'static str,
    /// Accent used for headings and decorations.
    pub accent: &'static str,
    /// Font family used when the card does not override it.
    pub font: &'static str,
}

/// The default palette.
pub const CLASSIC: Palette = Palette {
    key: "classic",
    label: "Classic",
    background: "linear-gradient(135deg, #ffdde1 0%, #ee9ca7 100%)",
    card: "#fff5f7",
    text: "#5a1a2b",
    accent: "#e63462",
    font: "Dancing Script",
};

/// Every theme the front end offers, classic first.
pub const PALETTES: &[Palette] = &[
    CLASSIC,
    Palette {
        key: "romantic",
        label: "Romantic",
        background: "linear-gradient(135deg, #f857a6 0%, #ff5858 100%)",
        card: "#fff0f3",
        text: "#4a0e1f",
        accent: "#c9184a",
        font: "Great Vibes",
    },
    Palette {
        key: "sunset",
        label: "Sunset",
        background: "linear-gradient(135deg, #fad0c4 0%, #ffd1ff 100%)",
        card: "#fffaf5",
        text: "#5c2a12",
        accent: "#f3722c",
        font: "Pacifico",
    },
    Palette {
        key: "lavender",
        label: "Lavender",
        background: "linear-gradient(135deg, #e0c3fc 0%, #8ec5fc 100%)",
        card: "#faf5ff",
        text: "#3c1f5c",
        accent: "#9d4edd",
        font: "Satisfy",
    },
    Palette {
        key: "midnight",
        label: "Midnight",
        background: "linear-gradient(135deg, #141e30 0%, #243b55 100%)",
        card: "#1f2a44",
        text: "#f8e9f0",
        accent: "#ff8fab",
        font: "Playfair Display",
    },
    Palette {
        key: "vintage",
        label: "Vintage",
        background: "linear-gradient(135deg, #eacda3 0%, #d6ae7b 100%)",
        card: "#fdf6e3",
        text: "#4e342e",
        accent: "#a1665e",
        font: "Cormorant Garamond",
    },
];

/// Key into [`PALETTES`].
///
/// Stored as the raw string so cards carrying a theme this build does not
/// know still round-trip unchanged. Unknown keys render with the classic
/// palette.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeKey(String);

impl ThemeKey {
    /// Key of the default theme.
    pub const DEFAULT: &'static str = "classic";

    /// Wrap a theme key without validating it.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key names an entry of [`PALETTES`].
    #[must_use]
    pub fn is_known(&self) -> bool {
        PALETTES.iter().any(|p| p.key == self.0)
    }

    /// Resolve the palette, falling back to classic for unknown keys.
    #[must_use]
    pub fn palette(&self) -> &'static Palette {
        PALETTES
            .iter()
            .find(|p| p.key == self.0)
            .unwrap_or(&CLASSIC)
    }
}

impl Default for ThemeKey {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ThemeKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_classic() {
        let theme = ThemeKey::default();
        assert_eq!(theme.as_str(), "classic");
        assert_eq!(theme.palette().label, "Classic");
    }

    #[test]
    fn test_known_theme_resolves() {
        let theme = ThemeKey::from("midnight");
        assert!(theme.is_known());
        assert_eq!(theme.palette().key, "midnight");
    }

    #[test]
    fn test_unknown_theme_falls_back_to_classic() {
        let theme = ThemeKey::from("neon");
        assert!(!theme.is_known());
        assert_eq!(theme.palette().key, "classic");
        // The key itself is preserved
        assert_eq!(theme.to_string(), "neon");
    }

    #[test]
    fn test_palette_keys_are_unique() {
        for (i, a) in PALETTES.iter().enumerate() {
            for b in PALETTES.iter().skip(i + 1) {
                assert_ne!(a.key, b.key);
            }
        }
    }
}

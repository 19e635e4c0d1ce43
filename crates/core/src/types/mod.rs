//! Core types for NOTE2U.
//!
//! This module provides the card model and type-safe wrappers around it.

pub mod card;
pub mod id;
pub mod theme;

pub use card::{CardData, CardPatch, Side, Sticker, defaults};
pub use id::{CardId, CardIdError};
pub use theme::{Palette, ThemeKey};

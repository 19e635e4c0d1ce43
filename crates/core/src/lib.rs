//! NOTE2U Core - Card model and share-token codec.
//!
//! This crate provides the types shared by every NOTE2U component:
//! - `store` - HTTP service persisting cards by id
//! - `cli` - Command-line tools for encoding, decoding, saving and fetching cards
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The browser front end (or any other renderer) drives
//! [`editor::update`] and reads [`editor::CardView`]; sharing goes through
//! [`codec`] and [`share`].
//!
//! # Modules
//!
//! - [`types`] - `CardData`, `CardId`, stickers and the theme palette
//! - [`codec`] - Card ⇄ URL-safe token
//! - [`share`] - Share links and viewer-mode URL parsing
//! - [`editor`] - Immutable editor state driven by a single update function

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod codec;
pub mod editor;
pub mod share;
pub mod types;

pub use codec::{DecodeError, Token, decode, decode_or_default, encode};
pub use types::*;

//! Paste service implementation.
//!
//! This crate wires the identifier codec, the secret token generator and a
//! repository into the [`Pastebin`](tinypaste_core::Pastebin) trait. Core
//! types are re-exported from `tinypaste_core`.

pub mod service;

pub use service::{PasteService, PasteServiceSettings, DEFAULT_PAGE_SIZE, DEFAULT_RESERVED_CODES};
pub use tinypaste_core::{CreatePaste, PasteError, PasteId, PasteRecord, Pastebin};

//! Core types and traits for the tinypaste service.
//!
//! This crate provides the identifier codec, the identifier types, the
//! storage contract and the service trait shared by the storage,
//! generator, service and gateway crates.

pub mod codec;
pub mod error;
pub mod paste_id;
pub mod pastebin;
pub mod repository;

pub use error::{CoreError, StorageError};
pub use paste_id::{PasteId, SecretToken, SECRET_MARKER};
pub use pastebin::{CreatePaste, PasteError, Pastebin};
pub use repository::{PasteRecord, ReadRepository, Repository};

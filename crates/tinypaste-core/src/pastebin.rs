use crate::error::{CoreError, StorageError};
use crate::paste_id::PasteId;
use crate::repository::PasteRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

type Result<T> = std::result::Result<T, PasteError>;

/// Parameters for creating a paste.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaste {
    /// The paste body. Must not be empty.
    pub text: String,
    /// Store under an unguessable token instead of a sequential key.
    #[serde(default)]
    pub secret: bool,
}

#[derive(Debug, Clone, Error)]
pub enum PasteError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("paste not found: {0}")]
    NotFound(String),
    #[error("could not mint a secret token after {attempts} attempts")]
    ResourceExhausted { attempts: u32 },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl PasteError {
    /// Read-path failures that callers should see as a single "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidIdentifier(_))
    }
}

impl From<CoreError> for PasteError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidIdentifier(message) => Self::InvalidIdentifier(message),
        }
    }
}

#[async_trait]
pub trait Pastebin: Send + Sync + 'static {
    /// Stores a paste and returns its identifier.
    async fn create(&self, params: CreatePaste) -> Result<PasteId>;

    /// Resolves the textual form of an identifier to its paste.
    async fn read(&self, raw_id: &str) -> Result<PasteRecord>;

    /// Lists public paste identifiers, newest first. `page` starts at 1.
    async fn list(&self, page: u64) -> Result<Vec<PasteId>>;
}

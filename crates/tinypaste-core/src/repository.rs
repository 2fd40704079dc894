use crate::error::StorageError;
use crate::paste_id::SecretToken;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored paste. Pastes are immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasteRecord {
    /// The paste body.
    pub text: String,
    /// When the paste was stored.
    pub created_at: Timestamp,
}

impl PasteRecord {
    /// Creates a record stamped with the current time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: Timestamp::now(),
        }
    }
}

/// A read-only view of a paste store.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves a public paste by its integer key.
    /// Returns `None` if the key was never assigned.
    async fn get_public(&self, key: u64) -> Result<Option<PasteRecord>>;

    /// Retrieves a secret paste by its token.
    /// Returns `None` if the token is unknown.
    async fn get_secret(&self, token: &SecretToken) -> Result<Option<PasteRecord>>;

    /// Checks whether a secret token is already taken.
    async fn exists(&self, token: &SecretToken) -> Result<bool>;

    /// Lists public paste keys, newest first.
    async fn list_public(&self, offset: u64, limit: u64) -> Result<Vec<u64>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Stores a public paste and returns the key the store assigned.
    ///
    /// Keys are monotonically increasing but not necessarily contiguous.
    async fn insert_public(&self, record: PasteRecord) -> Result<u64>;

    /// Stores a secret paste. Returns `Err(Conflict)` if the token already exists.
    async fn insert_secret(&self, token: &SecretToken, record: PasteRecord) -> Result<()>;
}

use thiserror::Error;
use tinypaste_core::{PasteError, StorageError};

/// Errors returned while minting a secret token.
#[derive(Debug, Clone, Error)]
pub enum MintError {
    #[error("no free secret token after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error("storage error while probing for collisions: {0}")]
    Storage(#[from] StorageError),
}

impl From<MintError> for PasteError {
    fn from(value: MintError) -> Self {
        match value {
            MintError::Exhausted { attempts } => PasteError::ResourceExhausted { attempts },
            MintError::Storage(source) => PasteError::Storage(source),
        }
    }
}

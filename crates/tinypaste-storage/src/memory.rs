use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tinypaste_core::repository::Result;
use tinypaste_core::{PasteRecord, ReadRepository, Repository, SecretToken, StorageError};

/// In-memory implementation of the repository traits using DashMap.
///
/// Public keys come from an atomic counter starting at 1, mirroring an
/// auto-increment column.
#[derive(Debug)]
pub struct InMemoryRepository {
    public: DashMap<u64, PasteRecord>,
    secret: DashMap<String, PasteRecord>,
    next_key: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::with_first_key(1)
    }

    /// Creates a repository whose first public paste gets `first_key`.
    pub fn with_first_key(first_key: u64) -> Self {
        Self {
            public: DashMap::new(),
            secret: DashMap::new(),
            next_key: AtomicU64::new(first_key),
        }
    }

    /// Number of stored pastes, public and secret.
    pub fn len(&self) -> usize {
        self.public.len() + self.secret.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get_public(&self, key: u64) -> Result<Option<PasteRecord>> {
        Ok(self.public.get(&key).map(|entry| entry.value().clone()))
    }

    async fn get_secret(&self, token: &SecretToken) -> Result<Option<PasteRecord>> {
        Ok(self
            .secret
            .get(token.as_str())
            .map(|entry| entry.value().clone()))
    }

    async fn exists(&self, token: &SecretToken) -> Result<bool> {
        Ok(self.secret.contains_key(token.as_str()))
    }

    async fn list_public(&self, offset: u64, limit: u64) -> Result<Vec<u64>> {
        let mut keys: Vec<u64> = self.public.iter().map(|entry| *entry.key()).collect();
        keys.sort_unstable_by(|a, b| b.cmp(a));

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(keys.into_iter().skip(offset).take(limit).collect())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert_public(&self, record: PasteRecord) -> Result<u64> {
        let key = self.next_key.fetch_add(1, Ordering::SeqCst);
        self.public.insert(key, record);
        Ok(key)
    }

    async fn insert_secret(&self, token: &SecretToken, record: PasteRecord) -> Result<()> {
        match self.secret.entry(token.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(token.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }
}

use crate::error::MintError;
use crate::{RandomTokenSource, TokenSource};
use tinypaste_core::{ReadRepository, SecretToken};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Configures how secret tokens are drawn and how hard to look for a free one.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct SecretIdSettings {
    /// Number of random symbols in the first tokens drawn (marker excluded).
    #[builder(default = 5)]
    pub initial_length: usize,
    /// Collisions tolerated at one length before the length grows by one.
    #[builder(default = 10)]
    pub max_collisions_per_length: u32,
    /// Total draws allowed for a single mint before giving up.
    #[builder(default = 1000)]
    pub max_attempts: u32,
}

impl Default for SecretIdSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Mints secret tokens that are not yet present in the store.
///
/// Draws tokens from a [`TokenSource`] and probes the store with
/// [`ReadRepository::exists`]. After more than `max_collisions_per_length`
/// consecutive collisions the token length grows by one. Minting is a
/// check-then-insert: the later insert still reports a lost race as a conflict.
#[derive(Debug, Clone)]
pub struct SecretIdGenerator<S = RandomTokenSource> {
    source: S,
    settings: SecretIdSettings,
}

impl SecretIdGenerator<RandomTokenSource> {
    /// Creates a generator backed by the thread-local RNG.
    pub fn new(settings: SecretIdSettings) -> Self {
        Self::with_source(settings, RandomTokenSource)
    }
}

impl<S: TokenSource> SecretIdGenerator<S> {
    pub fn with_source(settings: SecretIdSettings, source: S) -> Self {
        Self { source, settings }
    }

    pub fn settings(&self) -> &SecretIdSettings {
        &self.settings
    }

    /// Draws tokens until one is free in `repository`.
    pub async fn mint<R>(&self, repository: &R) -> Result<SecretToken, MintError>
    where
        R: ReadRepository + ?Sized,
    {
        let mut length = self.settings.initial_length.max(1);
        let mut collisions = 0_u32;

        for attempt in 1..=self.settings.max_attempts {
            if collisions > self.settings.max_collisions_per_length {
                length += 1;
                collisions = 0;
                debug!(length, attempt, "secret token collisions persist, widening");
            }

            let token = self.source.draw(length);
            if !repository.exists(&token).await? {
                trace!(length, attempt, "minted secret token");
                return Ok(token);
            }

            collisions += 1;
            trace!(length, attempt, "secret token collision");
        }

        Err(MintError::Exhausted {
            attempts: self.settings.max_attempts,
        })
    }
}

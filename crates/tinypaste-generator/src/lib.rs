pub mod error;
pub mod secret;

pub use error::MintError;
pub use secret::{SecretIdGenerator, SecretIdSettings};

use rand::Rng;
use tinypaste_core::codec;
use tinypaste_core::{SecretToken, SECRET_MARKER};

/// Source of candidate secret tokens.
///
/// Implementations are pure generators that don't interact with storage;
/// collision checks are the job of [`SecretIdGenerator`].
pub trait TokenSource: Send + Sync + 'static {
    /// Draws a token made of the marker followed by `length` alphabet symbols.
    fn draw(&self, length: usize) -> SecretToken;
}

/// Draws every symbol uniformly from the identifier alphabet using the
/// thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenSource;

impl TokenSource for RandomTokenSource {
    fn draw(&self, length: usize) -> SecretToken {
        let mut rng = rand::rng();
        let mut token = String::with_capacity(length + 1);
        token.push(SECRET_MARKER);
        for _ in 0..length {
            token.push(codec::symbol(rng.random_range(0..codec::ALPHABET.len() as u8)));
        }
        SecretToken::new_unchecked(token)
    }
}

use thiserror::Error;

/// Errors returned when building a rate limiter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("rate limit window must be non-zero")]
    ZeroWindow,
    #[error("rate limit window is out of range: {0}")]
    WindowOutOfRange(String),
}

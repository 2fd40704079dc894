//! Per-client sliding window rate limiting.

mod clock;
pub mod error;
mod limiter;

pub use clock::{Clock, SystemClock};
pub use error::RateLimitError;
pub use limiter::{RateDecision, RateLimiter, RateLimiterSettings};

use std::sync::Arc;

use tinypaste_core::Pastebin;
use tinypaste_ratelimit::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pastebin: Arc<dyn Pastebin>,
    limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(pastebin: Arc<dyn Pastebin>, limiter: Arc<RateLimiter>) -> Self {
        Self { pastebin, limiter }
    }

    pub fn pastebin(&self) -> &dyn Pastebin {
        self.pastebin.as_ref()
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

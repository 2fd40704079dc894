use crate::clock::{Clock, SystemClock};
use crate::error::RateLimitError;
use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Configures a [`RateLimiter`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct RateLimiterSettings {
    /// Requests admitted per token within one window.
    pub limit: u32,
    /// Length of the rolling window.
    #[builder(default = Duration::from_secs(60 * 60))]
    pub window: Duration,
}

/// Outcome of a single [`RateLimiter::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    /// The configured cap.
    pub limit: u32,
    /// Slots left after this request. Negative when the request was rejected.
    pub remaining: i64,
    /// Expiry of the oldest request still counted for the token.
    pub reset_at: Timestamp,
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        self.remaining >= 0
    }

    /// `reset_at` as seconds since the Unix epoch.
    pub fn reset_epoch_seconds(&self) -> i64 {
        self.reset_at.as_second()
    }
}

/// Sliding window rate limiter keyed by client token.
///
/// Each token owns a FIFO of expiry timestamps, one per admitted request.
/// Expired entries are purged lazily on the token's next check, so a token
/// that goes quiet keeps its last queue until [`RateLimiter::sweep`] runs.
///
/// The map is sharded: a check holds only the shard lock of its token, which
/// linearizes calls for the same token while other tokens proceed in parallel.
///
/// A token is admitted while fewer than `limit` entries are active. A
/// rejected request is not recorded, so rejections never extend the window.
pub struct RateLimiter<C: Clock = SystemClock> {
    settings: RateLimiterSettings,
    window: SignedDuration,
    windows: DashMap<String, VecDeque<Timestamp>>,
    clock: C,
}

impl RateLimiter<SystemClock> {
    /// Creates a limiter backed by the system clock.
    pub fn new(settings: RateLimiterSettings) -> Result<Self, RateLimitError> {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    pub fn with_clock(settings: RateLimiterSettings, clock: C) -> Result<Self, RateLimitError> {
        if settings.window.is_zero() {
            return Err(RateLimitError::ZeroWindow);
        }

        let window = SignedDuration::try_from(settings.window)
            .map_err(|e| RateLimitError::WindowOutOfRange(e.to_string()))?;

        Ok(Self {
            settings,
            window,
            windows: DashMap::new(),
            clock,
        })
    }

    pub fn settings(&self) -> &RateLimiterSettings {
        &self.settings
    }

    /// Counts a request for `token` at the clock's current time.
    pub fn check(&self, token: &str) -> RateDecision {
        self.check_at(token, self.clock.now())
    }

    /// Counts a request for `token` at `now`.
    pub fn check_at(&self, token: &str, now: Timestamp) -> RateDecision {
        let limit = i64::from(self.settings.limit);
        let mut entries = self.windows.entry(token.to_owned()).or_default();

        purge_expired(&mut entries, now);

        let active = entries.len() as i64;
        // A rejected request reports how far over the cap it would have been.
        let remaining = limit - active - 1;

        if active < limit {
            let expiry = now.checked_add(self.window).unwrap_or(Timestamp::MAX);
            // Keep the queue sorted even if callers pass out-of-order times.
            let expiry = entries.back().map_or(expiry, |&last| last.max(expiry));
            entries.push_back(expiry);
        } else {
            trace!(token, active, limit, "rate limit exceeded");
        }

        RateDecision {
            limit: self.settings.limit,
            remaining,
            reset_at: entries.front().copied().unwrap_or(now),
        }
    }

    /// Number of entries recorded for `token`, expired ones included.
    pub fn window_len(&self, token: &str) -> usize {
        self.windows.get(token).map_or(0, |entries| entries.len())
    }

    /// Number of tokens with state held in memory.
    pub fn tracked_tokens(&self) -> usize {
        self.windows.len()
    }

    /// Drops every token whose entries have all expired at the clock's current time.
    pub fn sweep(&self) -> usize {
        self.sweep_at(self.clock.now())
    }

    /// Drops every token whose entries have all expired at `now`.
    /// Returns the number of tokens removed.
    pub fn sweep_at(&self, now: Timestamp) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, entries| {
            purge_expired(entries, now);
            !entries.is_empty()
        });
        before.saturating_sub(self.windows.len())
    }
}

impl<C: Clock + 'static> RateLimiter<C> {
    /// Runs [`RateLimiter::sweep`] every `every` on the current tokio runtime.
    ///
    /// The task holds a weak reference and stops once the limiter is dropped.
    ///
    /// # Panics
    ///
    /// Panics if `every` is zero.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let limiter = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(limiter) = limiter.upgrade() else {
                    break;
                };
                let removed = limiter.sweep();
                debug!(
                    removed,
                    tracked = limiter.tracked_tokens(),
                    "swept idle rate limit windows"
                );
            }
        })
    }
}

fn purge_expired(entries: &mut VecDeque<Timestamp>, now: Timestamp) {
    while entries.front().is_some_and(|&expiry| expiry <= now) {
        entries.pop_front();
    }
}

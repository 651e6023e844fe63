//! Minimum spacing between consecutive submissions.
//!
//! All transfers in a run leave one sending account; firing them
//! back-to-back risks nonce races and provider-side rate limiting, so the
//! orchestrator sleeps this interval between tokens.

use std::time::Duration;

use tokio::time;

#[derive(Debug, Clone)]
pub struct RateLimiter {
    interval: Duration,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Suspend the caller for the configured interval.
    pub async fn wait(&self) {
        time::sleep(self.interval).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Rate limiting for Zoho API requests.
//!
//! Zoho enforces a per-minute request budget. The client counts its own
//! requests and takes a fixed pause once the budget is spent, then starts
//! a fresh window. No backoff, no header inspection: the counter is the
//! whole mechanism.

use std::time::Duration;

use tokio::sync::Mutex;
use tracing::info;

/// Requests allowed before pausing.
pub const REQUEST_LIMIT: u32 = 100;

/// How long to pause once the limit is reached.
pub const LIMIT_PAUSE: Duration = Duration::from_secs(60);

/// Request counter that sleeps when the budget is spent.
#[derive(Debug)]
pub struct RequestBudget {
    count: Mutex<u32>,
    limit: u32,
    pause: Duration,
}

impl Default for RequestBudget {
    fn default() -> Self {
        Self::new(REQUEST_LIMIT, LIMIT_PAUSE)
    }
}

impl RequestBudget {
    /// Create a budget with an explicit limit and pause.
    #[must_use]
    pub fn new(limit: u32, pause: Duration) -> Self {
        Self {
            count: Mutex::new(0),
            limit,
            pause,
        }
    }

    /// Record one request; sleeps for the configured pause and resets the
    /// counter when the limit is reached.
    pub async fn tick(&self) {
        let mut count = self.count.lock().await;
        *count += 1;
        if *count >= self.limit {
            info!(
                limit = self.limit,
                pause_secs = self.pause.as_secs(),
                "rate limit reached, sleeping"
            );
            tokio::time::sleep(self.pause).await;
            *count = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_pauses_after_limit_and_resets() {
        let budget = RequestBudget::new(100, Duration::from_secs(60));
        let start = tokio::time::Instant::now();

        for _ in 0..99 {
            budget.tick().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);

        // The 100th request trips the pause.
        budget.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(60));

        // The counter reset: the next 99 requests run without pausing.
        for _ in 0..99 {
            budget.tick().await;
        }
        assert_eq!(start.elapsed(), Duration::from_secs(60));

        budget.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(120));
    }
}

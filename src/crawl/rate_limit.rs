//! Rate limiting for outbound requests

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::Quota;
use nonzero_ext::nonzero;
use std::time::Duration;
use tracing::trace;

/// Global rate limiter with a minimum interval between permits
///
/// One instance covers all content requests in a run; the first call to
/// [`throttle`](RateLimiter::throttle) never blocks. Constructed fresh per
/// run so tests get an independent timer.
pub struct RateLimiter {
    limiter: governor::RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RateLimiter {
    /// Create a rate limiter with the given interval in seconds
    ///
    /// A zero interval disables waiting in practice (1000 permits/second).
    pub fn new(interval_secs: f64) -> Self {
        let quota = Quota::with_period(Duration::from_secs_f64(interval_secs.max(0.0)))
            .unwrap_or_else(|| Quota::per_second(nonzero!(1000u32)));

        Self {
            limiter: governor::RateLimiter::direct(quota),
        }
    }

    /// Wait until the next request is allowed
    pub async fn throttle(&self) {
        trace!("Waiting for rate limiter permit");
        self.limiter.until_ready().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_minimum_interval_enforced() {
        let limiter = RateLimiter::new(0.1);

        let start = Instant::now();
        limiter.throttle().await;
        limiter.throttle().await;
        limiter.throttle().await;
        let elapsed = start.elapsed();

        // Three permits span two intervals
        assert!(elapsed >= Duration::from_millis(180));
    }

    #[tokio::test]
    async fn test_first_call_does_not_block() {
        let limiter = RateLimiter::new(5.0);

        let start = Instant::now();
        limiter.throttle().await;
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_zero_interval() {
        let limiter = RateLimiter::new(0.0);

        for _ in 0..10 {
            limiter.throttle().await;
        }
    }
}

//! Shared fetch-attempt budget
//!
//! One token bucket per run, refilling at `requests-per-minute / 60` tokens
//! per second with burst capacity equal to the per-minute rate. The bucket
//! is the only mutable state shared between workers; governor guarantees
//! no token double-issuance and bounded waiting under concurrent
//! acquisition.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Run-scoped request budget shared by reference across all workers
///
/// Acquiring a token may suspend the calling worker, but never blocks
/// sibling workers from making progress on their own sites.
pub struct RequestBudget {
    limiter: DirectRateLimiter,
}

impl RequestBudget {
    /// Creates a budget from the configured per-minute rate
    ///
    /// The rate must already be validated as positive by the config loader.
    pub fn new(requests_per_minute: u32) -> Self {
        let quota = Quota::per_minute(
            NonZeroU32::new(requests_per_minute).expect("requests_per_minute must be > 0"),
        );
        Self {
            limiter: RateLimiter::direct(quota),
        }
    }

    /// Creates a budget with a custom quota
    pub fn with_quota(quota: Quota) -> Self {
        Self {
            limiter: RateLimiter::direct(quota),
        }
    }

    /// Waits until one fetch attempt is allowed
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    #[tokio::test]
    async fn test_burst_tokens_are_immediate() {
        let budget = RequestBudget::new(60);

        let start = Instant::now();
        for _ in 0..5 {
            budget.acquire().await;
        }

        // Well within the 60-token burst capacity, so no waiting
        assert!(start.elapsed().as_millis() < 100);
    }

    #[tokio::test]
    async fn test_acquire_paces_past_burst() {
        // Burst of 1, refill 10/sec: 6 acquires need ~500ms of refill
        let quota = Quota::per_second(NonZeroU32::new(10).unwrap())
            .allow_burst(NonZeroU32::new(1).unwrap());
        let budget = RequestBudget::with_quota(quota);

        let start = Instant::now();
        for _ in 0..6 {
            budget.acquire().await;
        }

        assert!(
            start.elapsed().as_millis() >= 400,
            "budget did not pace acquisitions: {:?}",
            start.elapsed()
        );
    }

    #[tokio::test]
    async fn test_concurrent_acquisition_issues_each_token_once() {
        // Burst of 1, refill 20/sec: 10 concurrent waiters need ~450ms
        let quota = Quota::per_second(NonZeroU32::new(20).unwrap())
            .allow_burst(NonZeroU32::new(1).unwrap());
        let budget = Arc::new(RequestBudget::with_quota(quota));

        let start = Instant::now();
        let mut handles = Vec::new();
        for _ in 0..10 {
            let budget = Arc::clone(&budget);
            handles.push(tokio::spawn(async move {
                budget.acquire().await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // 9 waiters beyond the burst token at 20/sec is at least 400ms;
        // if tokens were double-issued this would complete early
        assert!(
            start.elapsed().as_millis() >= 400,
            "tokens were over-issued: {:?}",
            start.elapsed()
        );
    }
}

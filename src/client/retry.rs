//! Bounded retry with exponential backoff.
//!
//! Wraps an attempt-indexed async operation and re-runs it on transient
//! failures only. Permanent failures (validation, 4xx, decode errors)
//! propagate on the first attempt; the last transient error is returned
//! unchanged once attempts are exhausted, so a 429 that never clears still
//! surfaces as the rate-limit error and not a generic one.

use std::future::Future;
use std::time::Duration;

use crate::types::{Result, RetryConfig};

/// Retry driver for one upstream.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Total attempts including the first. Never less than 1.
    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts.max(1)
    }

    /// Backoff before the retry that follows `attempt` (0-indexed):
    /// `base_delay * 2^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.config
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.config.max_delay)
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// The closure receives the 0-indexed attempt number. Rate limiting
    /// belongs inside `op` so retried attempts are paced like first ones.
    pub async fn execute<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt + 1 < max_attempts => {
                    let delay = self.delay_for_attempt(attempt);
                    tracing::debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Error;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn policy(max_attempts: u32, base_ms: u64, max_ms: u64) -> RetryPolicy {
        RetryPolicy::new(RetryConfig {
            max_attempts,
            base_delay: Duration::from_millis(base_ms),
            max_delay: Duration::from_millis(max_ms),
        })
    }

    #[tokio::test]
    async fn test_success_needs_one_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = policy(3, 1, 10)
            .execute(move |_| {
                let calls = Arc::clone(&counter);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_then_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = policy(3, 100, 1_000)
            .execute(move |_| {
                let calls = Arc::clone(&counter);
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(Error::timeout("deadline"))
                    } else {
                        Ok("ok")
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), "ok");
        // Two failures plus the success: exactly three invocations.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result: Result<()> = policy(5, 1, 10)
            .execute(move |_| {
                let calls = Arc::clone(&counter);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(Error::upstream(404, "no such bill"))
                }
            })
            .await;
        assert!(matches!(result, Err(Error::Upstream { status: 404, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error_unchanged() {
        let result: Result<()> = policy(3, 10, 100)
            .execute(|_| async { Err(Error::rate_limited("govinfo.gov")) })
            .await;
        match result {
            Err(Error::RateLimited { upstream }) => assert_eq!(upstream, "govinfo.gov"),
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_doubles_between_attempts() {
        let start = tokio::time::Instant::now();
        let _: Result<()> = policy(3, 100, 10_000)
            .execute(|_| async { Err(Error::network("reset")) })
            .await;
        // Delays: 100ms after attempt 0, 200ms after attempt 1.
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[test]
    fn test_delay_table() {
        let p = policy(5, 100, 1_000);
        assert_eq!(p.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(p.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(p.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(p.delay_for_attempt(3), Duration::from_millis(800));
        assert_eq!(p.delay_for_attempt(4), Duration::from_millis(1_000));
        assert_eq!(p.delay_for_attempt(30), Duration::from_millis(1_000));
    }

    #[test]
    fn test_zero_attempts_behaves_as_one() {
        assert_eq!(policy(0, 1, 1).max_attempts(), 1);
    }

    proptest! {
        #[test]
        fn prop_delay_never_exceeds_cap(
            base_ms in 1u64..5_000,
            max_ms in 1u64..60_000,
            attempt in 0u32..64,
        ) {
            let p = policy(3, base_ms, max_ms);
            prop_assert!(p.delay_for_attempt(attempt) <= Duration::from_millis(max_ms));
        }

        #[test]
        fn prop_delay_is_monotone(
            base_ms in 1u64..5_000,
            max_ms in 1u64..60_000,
            attempt in 0u32..63,
        ) {
            let p = policy(3, base_ms, max_ms);
            prop_assert!(p.delay_for_attempt(attempt) <= p.delay_for_attempt(attempt + 1));
        }
    }
}

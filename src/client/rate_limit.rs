//! Outbound call pacing.
//!
//! A token bucket per upstream host spaces API calls so the process stays
//! inside published quotas regardless of how many tool invocations run
//! concurrently. Defaults (one token, 100ms refill) reproduce the fixed
//! inter-request delay the upstreams expect.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::types::RateLimitConfig;

/// Token bucket limiter shared by every request to one upstream.
///
/// `acquire` suspends the caller until a token is available; there is no
/// error path and no way to skip the wait. The interval is fixed at
/// construction.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    burst_capacity: u32,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: u32,
    last_refill: Instant,
}

impl RateLimiter {
    /// Build a limiter from config. A zero interval would spin the refill
    /// math, so it is clamped to 1ms; capacity is clamped to at least 1.
    pub fn new(config: RateLimitConfig) -> Self {
        let min_interval = config.min_interval.max(Duration::from_millis(1));
        let burst_capacity = config.burst_capacity.max(1);
        Self {
            min_interval,
            burst_capacity,
            state: Mutex::new(BucketState {
                tokens: burst_capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Time to mint one token.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for a token, then consume it.
    ///
    /// The bucket lock is released before sleeping, so waiters do not block
    /// refill observation for each other and a cancelled caller cannot hold
    /// the lock across an await.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                self.refill(&mut state, now);
                if state.tokens > 0 {
                    state.tokens -= 1;
                    return;
                }
                (state.last_refill + self.min_interval).saturating_duration_since(now)
            };
            // Several waiters may wake for one token; the losers loop and
            // recompute their wait. No fairness ordering is guaranteed.
            tokio::time::sleep(wait).await;
        }
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        let elapsed = now.duration_since(state.last_refill);
        let minted = (elapsed.as_nanos() / self.min_interval.as_nanos()) as u64;
        if minted == 0 {
            return;
        }
        let missing = u64::from(self.burst_capacity - state.tokens);
        if minted >= missing {
            state.tokens = self.burst_capacity;
            state.last_refill = now;
        } else {
            state.tokens += minted as u32;
            state.last_refill += self.min_interval * (minted as u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn limiter(interval_ms: u64, burst: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            min_interval: Duration::from_millis(interval_ms),
            burst_capacity: burst,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_acquire_is_immediate() {
        let rl = limiter(100, 1);
        let start = Instant::now();
        rl.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_acquires_are_spaced() {
        let rl = limiter(100, 1);
        let start = Instant::now();
        for _ in 0..4 {
            rl.acquire().await;
        }
        let elapsed = start.elapsed();
        // Four acquires from a one-token bucket need three refills.
        assert!(elapsed >= Duration::from_millis(300), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(400), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_capacity_front_loads_tokens() {
        let rl = limiter(100, 3);
        let start = Instant::now();
        for _ in 0..3 {
            rl.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);

        rl.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_bucket_refills_to_capacity_only() {
        let rl = limiter(100, 2);
        rl.acquire().await;
        rl.acquire().await;

        // A long idle period must not accumulate more than burst_capacity.
        tokio::time::sleep(Duration::from_secs(10)).await;
        let start = Instant::now();
        rl.acquire().await;
        rl.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        rl.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_acquires_share_one_bucket() {
        let rl = Arc::new(limiter(50, 1));
        let start = Instant::now();
        let mut handles = Vec::new();
        for _ in 0..5 {
            let rl = Arc::clone(&rl);
            handles.push(tokio::spawn(async move { rl.acquire().await }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        // Five acquires across tasks still pace at one per interval.
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let rl = limiter(0, 0);
        assert_eq!(rl.min_interval(), Duration::from_millis(1));
    }
}

// src/fetch/pacing.rs
// =============================================================================
// Crawl-wide politeness gate.
//
// acquire() returns at most once per interval across the whole crawl, no
// matter how many tasks are waiting. The gate remembers when it last let a
// task through; the next caller sleeps until a full interval has passed
// since then. Waiting tasks queue on the lock and are released one at a
// time. Release order among waiters is not guaranteed.
//
// An idle gate banks nothing: after a long pause one caller passes
// immediately and the next one still waits the full interval.
//
// Rust concepts:
// - tokio::sync::Mutex: an async lock that may be held across .await, so
//   the sleep happens while holding it and nobody can slip in between
// - Option<Instant>: "never released yet" is None, so the first call
//   does not wait
// =============================================================================

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{self, Instant};

#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_release: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// A zero interval disables pacing.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_release: Mutex::new(None),
        }
    }

    /// Waits until at least one interval has passed since the previous
    /// acquire() returned anywhere. The first call returns immediately.
    pub async fn acquire(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let mut last_release = self.last_release.lock().await;
        if let Some(previous) = *last_release {
            time::sleep_until(previous + self.min_interval).await;
        }
        *last_release = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_sequential_acquires_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        let start = Instant::now();

        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_waiters_are_released_one_per_interval() {
        let interval = Duration::from_millis(50);
        let limiter = Arc::new(RateLimiter::new(interval));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                Instant::now()
            }));
        }

        let mut released = Vec::new();
        for handle in handles {
            released.push(handle.await.unwrap());
        }
        released.sort();

        for pair in released.windows(2) {
            assert!(pair[1] - pair[0] >= interval);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_caller_restarts_the_interval() {
        let interval = Duration::from_millis(100);
        let limiter = RateLimiter::new(interval);

        limiter.acquire().await;

        // Arrive a few milliseconds after the interval elapsed
        time::advance(Duration::from_millis(104)).await;
        limiter.acquire().await;
        let late = Instant::now();

        limiter.acquire().await;
        let next = Instant::now();

        assert!(
            next - late >= interval,
            "released {:?} apart",
            next - late
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_gate_does_not_bank_permits() {
        let interval = Duration::from_millis(50);
        let limiter = RateLimiter::new(interval);

        limiter.acquire().await;
        time::sleep(Duration::from_millis(500)).await;

        // One caller passes after the idle period, the next one waits
        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        limiter.acquire().await;
        assert!(start.elapsed() >= interval);
    }

    #[tokio::test]
    async fn test_zero_interval_never_blocks() {
        let limiter = RateLimiter::new(Duration::ZERO);
        for _ in 0..100 {
            limiter.acquire().await;
        }
    }
}

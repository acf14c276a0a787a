//! Sliding-window rate limiter.
//!
//! One instance per logical channel. The window is half-open: a call exactly
//! `window` old has already expired. Timestamps age out in arrival order, so
//! pruning is a prefix trim on the deque.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Bounds calls to `max_calls` per rolling `window`.
///
/// The prune-check-append sequence in [`allow_call`](Self::allow_call) runs
/// under a single lock acquisition, so concurrent callers on the same
/// channel can never exceed `max_calls`.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            calls: Mutex::new(VecDeque::new()),
        }
    }

    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or refuse a call. Refused calls are not recorded.
    pub async fn allow_call(&self) -> bool {
        let now = Instant::now();
        let mut calls = self.calls.lock().await;
        Self::prune(&mut calls, now, self.window);
        if calls.len() >= self.max_calls {
            return false;
        }
        calls.push_back(now);
        true
    }

    /// Time until the oldest recorded call ages out and a slot frees up.
    /// Zero when a slot is already free.
    pub async fn wait_time(&self) -> Duration {
        let now = Instant::now();
        let mut calls = self.calls.lock().await;
        Self::prune(&mut calls, now, self.window);
        if calls.len() < self.max_calls {
            return Duration::ZERO;
        }
        calls
            .front()
            .map(|oldest| (*oldest + self.window).saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    /// Forget all recorded calls.
    pub async fn reset(&self) {
        self.calls.lock().await.clear();
    }

    /// Number of calls still inside the window.
    pub async fn in_flight(&self) -> usize {
        let now = Instant::now();
        let mut calls = self.calls.lock().await;
        Self::prune(&mut calls, now, self.window);
        calls.len()
    }

    fn prune(calls: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(front) = calls.front() {
            if now.duration_since(*front) >= window {
                calls.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_admits_up_to_max_then_refuses() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.allow_call().await);
        assert!(limiter.allow_call().await);
        assert!(!limiter.allow_call().await);
        assert!(limiter.wait_time().await > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_refused_call_is_not_recorded() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.allow_call().await);
        assert!(!limiter.allow_call().await);
        assert!(!limiter.allow_call().await);
        assert_eq!(limiter.in_flight().await, 1);
    }

    #[tokio::test]
    async fn test_slot_frees_after_window() {
        let limiter = RateLimiter::new(2, Duration::from_millis(50));
        assert!(limiter.allow_call().await);
        assert!(limiter.allow_call().await);
        assert!(!limiter.allow_call().await);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(limiter.allow_call().await);
    }

    #[tokio::test]
    async fn test_wait_time_zero_when_slot_free() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert_eq!(limiter.wait_time().await, Duration::ZERO);
        limiter.allow_call().await;
        assert_eq!(limiter.wait_time().await, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_wait_time_bounded_by_window() {
        let window = Duration::from_secs(60);
        let limiter = RateLimiter::new(1, window);
        limiter.allow_call().await;
        let wait = limiter.wait_time().await;
        assert!(wait > Duration::ZERO);
        assert!(wait <= window);
    }

    #[tokio::test]
    async fn test_reset_clears_window() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.allow_call().await);
        assert!(!limiter.allow_call().await);
        limiter.reset().await;
        assert!(limiter.allow_call().await);
    }

    #[tokio::test]
    async fn test_concurrent_admission_never_exceeds_max() {
        let limiter = Arc::new(RateLimiter::new(5, Duration::from_secs(60)));
        let mut handles = Vec::new();
        for _ in 0..20 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move { limiter.allow_call().await }));
        }
        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 5);
    }
}

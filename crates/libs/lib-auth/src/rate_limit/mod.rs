//! # Attempt Rate Limiting
//!
//! Fixed-window attempt counters keyed by `"<operation>:<caller>"`.
//!
//! The first attempt for a key opens a window and counts as 1. Attempts inside
//! the open window are allowed while the count stays at or below
//! `max_attempts`. Once the window elapses the key starts over.
//!
//! The counter table lives behind [`RateLimitStore`] and is handed to the
//! limiter at construction. [`MemoryRateLimitStore`] keeps it in process
//! memory: state is lost on restart and not shared between instances, which
//! makes it a brute-force deterrent rather than a security boundary.

mod store;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::Result;

pub use store::MemoryRateLimitStore;

/// Backing table for attempt counters.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Record one attempt for `key` and return the attempt count in its current window.
    ///
    /// Opens a new window of length `window` if none is open or the old one elapsed.
    async fn hit(&self, key: &str, window: Duration) -> Result<u32>;

    /// Drop windows that have elapsed. Returns how many were removed.
    async fn purge_expired(&self) -> Result<usize>;
}

/// Window length and attempt cap for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub window: Duration,
    pub max_attempts: u32,
}

impl RateLimitPolicy {
    pub const fn new(window: Duration, max_attempts: u32) -> Self {
        Self { window, max_attempts }
    }

    /// Login: 10 attempts per minute.
    pub const LOGIN: Self = Self::new(Duration::from_secs(60), 10);

    /// Registration: 5 attempts per minute.
    pub const REGISTER: Self = Self::new(Duration::from_secs(60), 5);
}

/// Counter key for an (operation, caller) pair.
pub fn rate_limit_key(operation: &str, caller: &str) -> String {
    format!("{operation}:{caller}")
}

/// Attempt limiter over an injected store.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self { store }
    }

    /// Limiter backed by a fresh in-process table.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryRateLimitStore::new()))
    }

    /// Record an attempt for `key`; `true` if it is within the limit.
    ///
    /// If the store fails the attempt is allowed: the limiter is best-effort
    /// and must not take authentication down with it.
    pub async fn try_acquire(&self, key: &str, window: Duration, max_attempts: u32) -> bool {
        match self.store.hit(key, window).await {
            Ok(count) if count <= max_attempts => true,
            Ok(count) => {
                warn!("[RATE LIMIT] Denied {} (attempt {} of {})", key, count, max_attempts);
                false
            }
            Err(e) => {
                warn!("[RATE LIMIT] Store unavailable, allowing {}: {}", key, e);
                true
            }
        }
    }

    /// [`try_acquire`](Self::try_acquire) for an operation/caller pair under `policy`.
    pub async fn check(&self, operation: &str, caller: &str, policy: RateLimitPolicy) -> bool {
        let key = rate_limit_key(operation, caller);
        self.try_acquire(&key, policy.window, policy.max_attempts).await
    }

    /// Purge elapsed windows from the store.
    pub async fn purge_expired(&self) -> usize {
        match self.store.purge_expired().await {
            Ok(removed) => removed,
            Err(e) => {
                warn!("[RATE LIMIT] Purge failed: {}", e);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const MINUTE: Duration = Duration::from_secs(60);

    struct FailingStore;

    #[async_trait]
    impl RateLimitStore for FailingStore {
        async fn hit(&self, _key: &str, _window: Duration) -> Result<u32> {
            Err(Error::RateLimitStore("connection refused".to_string()))
        }

        async fn purge_expired(&self) -> Result<usize> {
            Err(Error::RateLimitStore("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_eleventh_attempt_denied() {
        let limiter = RateLimiter::in_memory();

        for attempt in 1..=10 {
            assert!(
                limiter.try_acquire("login:10.0.0.1", MINUTE, 10).await,
                "attempt {attempt} should be allowed"
            );
        }
        assert!(!limiter.try_acquire("login:10.0.0.1", MINUTE, 10).await);
        assert!(!limiter.try_acquire("login:10.0.0.1", MINUTE, 10).await);
    }

    #[tokio::test]
    async fn test_window_resets_after_elapsing() {
        let limiter = RateLimiter::in_memory();
        let window = Duration::from_millis(50);

        assert!(limiter.try_acquire("k", window, 1).await);
        assert!(!limiter.try_acquire("k", window, 1).await);

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(limiter.try_acquire("k", window, 1).await);
    }

    #[tokio::test]
    async fn test_operations_tracked_separately() {
        let limiter = RateLimiter::in_memory();
        let policy = RateLimitPolicy::new(MINUTE, 1);

        assert!(limiter.check("register", "1.2.3.4", policy).await);
        assert!(!limiter.check("register", "1.2.3.4", policy).await);

        assert!(limiter.check("login", "1.2.3.4", policy).await);
        assert!(limiter.check("register", "5.6.7.8", policy).await);
    }

    #[tokio::test]
    async fn test_store_failure_allows() {
        let limiter = RateLimiter::new(Arc::new(FailingStore));

        assert!(limiter.try_acquire("login:1.1.1.1", MINUTE, 0).await);
        assert_eq!(limiter.purge_expired().await, 0);
    }

    #[test]
    fn test_default_policies() {
        assert_eq!(RateLimitPolicy::LOGIN.max_attempts, 10);
        assert_eq!(RateLimitPolicy::REGISTER.max_attempts, 5);
        assert_eq!(RateLimitPolicy::LOGIN.window, MINUTE);
        assert_eq!(rate_limit_key("login", "::1"), "login:::1");
    }
}

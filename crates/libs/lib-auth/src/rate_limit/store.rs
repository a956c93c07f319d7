//! In-process counter table.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::RateLimitStore;
use crate::Result;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    expires_at: Instant,
}

/// Counter table in a concurrent map.
///
/// Each hit holds the key's shard lock for the read-modify-write, so
/// concurrent attempts on the same key never lose an increment.
#[derive(Debug, Default)]
pub struct MemoryRateLimitStore {
    windows: DashMap<String, Window>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// [`RateLimitStore::hit`] evaluated at `now`.
    pub fn hit_at(&self, key: &str, window: Duration, now: Instant) -> u32 {
        let fresh = Window { count: 0, expires_at: now + window };

        let mut entry = self.windows.entry(key.to_string()).or_insert(fresh);
        if now >= entry.expires_at {
            *entry = fresh;
        }
        entry.count = entry.count.saturating_add(1);
        entry.count
    }

    /// Remove windows elapsed at `now`.
    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, w| now < w.expires_at);
        before.saturating_sub(self.windows.len())
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn hit(&self, key: &str, window: Duration) -> Result<u32> {
        Ok(self.hit_at(key, window, Instant::now()))
    }

    async fn purge_expired(&self) -> Result<usize> {
        Ok(self.purge_expired_at(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_counts_within_window() {
        let store = MemoryRateLimitStore::new();
        let t0 = Instant::now();

        assert_eq!(store.hit_at("a", MINUTE, t0), 1);
        assert_eq!(store.hit_at("a", MINUTE, t0 + Duration::from_secs(10)), 2);
        assert_eq!(store.hit_at("a", MINUTE, t0 + Duration::from_secs(59)), 3);
    }

    #[test]
    fn test_resets_when_window_elapsed() {
        let store = MemoryRateLimitStore::new();
        let t0 = Instant::now();

        for _ in 0..11 {
            store.hit_at("a", MINUTE, t0);
        }
        assert_eq!(store.hit_at("a", MINUTE, t0 + MINUTE), 1);
        // The new window is anchored at the reset, not the original start.
        assert_eq!(store.hit_at("a", MINUTE, t0 + MINUTE + Duration::from_secs(59)), 2);
    }

    #[test]
    fn test_purge_removes_only_elapsed() {
        let store = MemoryRateLimitStore::new();
        let t0 = Instant::now();

        store.hit_at("old", MINUTE, t0);
        store.hit_at("new", MINUTE, t0 + Duration::from_secs(30));

        assert_eq!(store.purge_expired_at(t0 + Duration::from_secs(61)), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.hit_at("new", MINUTE, t0 + Duration::from_secs(62)), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_hits_not_lost() {
        let store = Arc::new(MemoryRateLimitStore::new());

        let handles: Vec<_> = (0..200)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.hit("shared", MINUTE).await.unwrap() })
            })
            .collect();

        let mut seen = Vec::new();
        for handle in handles {
            seen.push(handle.await.unwrap());
        }
        seen.sort_unstable();

        assert_eq!(seen, (1..=200).collect::<Vec<u32>>());
    }
}

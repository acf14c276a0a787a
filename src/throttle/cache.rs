//! TTL cache for short-lived outbound-call results.
//!
//! Expiry is lazy on `get`, with an eager `cleanup` sweep for callers that
//! run it under a periodic timer. No eviction beyond TTL: the cache is
//! unbounded in count but bounded in staleness.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Key-value store with per-entry expiry.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    default_ttl: Duration,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Look up a key. An entry at or past its expiry is removed and
    /// reported absent, never returned stale.
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert with the default TTL, replacing any existing entry.
    pub async fn insert(&self, key: K, value: V) {
        self.insert_with_ttl(key, value, self.default_ttl).await;
    }

    /// Insert with an explicit TTL, replacing any existing entry.
    pub async fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().await.insert(key, entry);
    }

    /// Remove a key. Returns whether an entry was present.
    pub async fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.lock().await.remove(key).is_some()
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Eagerly sweep all expired entries. Bounds memory for entries that
    /// are set once and never queried again.
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = entries.len(), "cache sweep");
        }
    }

    /// Number of stored entries, expired or not. Run `cleanup` first for a
    /// live count.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hit_before_ttl() {
        let cache: TtlCache<String, String> = TtlCache::new(Duration::from_secs(60));
        cache.insert("k".to_string(), "v".to_string()).await;
        assert_eq!(cache.get("k").await.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_miss_after_ttl_removes_entry() {
        let cache: TtlCache<String, String> = TtlCache::new(Duration::from_secs(60));
        cache
            .insert_with_ttl("k".to_string(), "v".to_string(), Duration::from_millis(20))
            .await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.get("k").await, None);
        // Lazy expiry removed the entry, not just hid it.
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_insert_replaces_existing_entry() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("k".to_string(), 1).await;
        cache.insert("k".to_string(), 2).await;
        assert_eq!(cache.get("k").await, Some(2));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_cleanup_sweeps_expired_only() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        cache
            .insert_with_ttl("old".to_string(), 1, Duration::from_millis(10))
            .await;
        cache.insert("fresh".to_string(), 2).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(cache.len().await, 2);
        cache.cleanup().await;
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("fresh").await, Some(2));
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1).await;
        cache.insert("b".to_string(), 2).await;

        assert!(cache.remove("a").await);
        assert!(!cache.remove("a").await);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}

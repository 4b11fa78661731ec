//! In-process cache with per-entry expiry

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    cache::{Cache, CacheEntry, CacheKey, CacheValue},
    stats::{create_stats_collector, SharedStatsCollector},
    CacheResult, CacheStats,
};

/// TTL-based cache implementation
pub struct TtlCache<K, V> {
    default_ttl: Duration,
    store: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
    stats: SharedStatsCollector,
}

impl<K: CacheKey + 'static, V: CacheValue + 'static> TtlCache<K, V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            store: Arc::new(RwLock::new(HashMap::new())),
            stats: create_stats_collector(),
        }
    }

    /// Drop expired entries; returns how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let mut store = self.store.write();
        let now = Instant::now();
        let before = store.len();
        store.retain(|_, entry| !entry.expires_at.is_some_and(|expires_at| now > expires_at));
        before - store.len()
    }

    /// Start a background cleanup task
    pub fn start_cleanup_task(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let removed = self.cleanup_expired();
                if removed > 0 {
                    tracing::trace!("Evicted {} expired cache entries", removed);
                }
            }
        })
    }
}

#[async_trait]
impl<K: CacheKey + 'static, V: CacheValue + 'static> Cache<K, V> for TtlCache<K, V> {
    async fn get(&self, key: &K) -> CacheResult<Option<V>> {
        let mut store = self.store.write();
        if store.get(key).is_some_and(|entry| entry.is_expired()) {
            store.remove(key);
        }
        let result = store.get_mut(key).map(|entry| {
            entry.record_access();
            entry.value.clone()
        });

        if result.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        Ok(result)
    }

    async fn put(&self, key: K, value: V) -> CacheResult<()> {
        self.put_with_ttl(key, value, self.default_ttl).await
    }

    async fn put_with_ttl(&self, key: K, value: V, ttl: Duration) -> CacheResult<()> {
        self.store.write().insert(key, CacheEntry::with_ttl(value, ttl));
        self.stats.record_put();
        Ok(())
    }

    async fn remove(&self, key: &K) -> CacheResult<bool> {
        let removed = self.store.write().remove(key).is_some_and(|entry| !entry.is_expired());
        if removed {
            self.stats.record_removal();
        }
        Ok(removed)
    }

    async fn clear(&self) -> CacheResult<()> {
        self.store.write().clear();
        Ok(())
    }

    async fn len(&self) -> CacheResult<usize> {
        let store = self.store.read();
        Ok(store.values().filter(|entry| !entry.is_expired()).count())
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        let len = self.len().await?;
        Ok(self.stats.get_stats(len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = TtlCache::new(Duration::from_millis(100));

        cache.put("key1", "value1").await.unwrap();
        assert_eq!(cache.get(&"key1").await.unwrap(), Some("value1"));

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(cache.get(&"key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_custom_ttl() {
        let cache = TtlCache::new(Duration::from_secs(10));

        cache
            .put_with_ttl("key1", "value1", Duration::from_millis(50))
            .await
            .unwrap();
        cache.put("key2", "value2").await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.get(&"key1").await.unwrap(), None);
        assert_eq!(cache.get(&"key2").await.unwrap(), Some("value2"));
    }

    #[tokio::test]
    async fn test_remove_reports_presence() {
        let cache = TtlCache::new(Duration::from_secs(10));
        cache.put("k", 1).await.unwrap();
        assert!(cache.remove(&"k").await.unwrap());
        assert!(!cache.remove(&"k").await.unwrap());
    }

    #[tokio::test]
    async fn test_cleanup() {
        let cache = TtlCache::new(Duration::from_millis(50));
        for i in 0..5 {
            cache.put(i, i * 10).await.unwrap();
        }
        assert_eq!(cache.len().await.unwrap(), 5);

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.cleanup_expired(), 5);
        assert_eq!(cache.len().await.unwrap(), 0);
    }
}

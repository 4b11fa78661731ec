//! Moka-based cache with per-entry expiry

use async_trait::async_trait;
use moka::future::Cache as MokaInner;
use moka::Expiry;
use std::time::{Duration, Instant};

use crate::{
    cache::{Cache, CacheKey, CacheValue},
    stats::{create_stats_collector, SharedStatsCollector},
    CacheResult, CacheStats,
};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    ttl: Option<Duration>,
}

/// Expires each entry after the TTL it was inserted with
struct PerEntryExpiry;

impl<K, V> Expiry<K, Entry<V>> for PerEntryExpiry {
    fn expire_after_create(&self, _key: &K, value: &Entry<V>, _created_at: Instant) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &K,
        value: &Entry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// Moka-based cache wrapper
pub struct MokaCache<K, V> {
    inner: MokaInner<K, Entry<V>>,
    default_ttl: Option<Duration>,
    stats: SharedStatsCollector,
}

impl<K, V> MokaCache<K, V>
where
    K: CacheKey + 'static,
    V: CacheValue + 'static,
{
    /// Create a new Moka cache with max capacity and no default expiry
    pub fn new(max_capacity: u64) -> Self {
        Self::builder().max_capacity(max_capacity).build()
    }

    pub fn builder() -> MokaCacheBuilder<K, V> {
        MokaCacheBuilder::new()
    }

    /// Process pending evictions; moka applies them lazily
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }
}

#[async_trait]
impl<K, V> Cache<K, V> for MokaCache<K, V>
where
    K: CacheKey + 'static,
    V: CacheValue + 'static,
{
    async fn get(&self, key: &K) -> CacheResult<Option<V>> {
        let result = self.inner.get(key).await.map(|entry| entry.value);

        if result.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        Ok(result)
    }

    async fn put(&self, key: K, value: V) -> CacheResult<()> {
        self.inner
            .insert(
                key,
                Entry {
                    value,
                    ttl: self.default_ttl,
                },
            )
            .await;
        self.stats.record_put();
        Ok(())
    }

    async fn put_with_ttl(&self, key: K, value: V, ttl: Duration) -> CacheResult<()> {
        self.inner.insert(key, Entry { value, ttl: Some(ttl) }).await;
        self.stats.record_put();
        Ok(())
    }

    async fn remove(&self, key: &K) -> CacheResult<bool> {
        let removed = self.inner.remove(key).await.is_some();
        if removed {
            self.stats.record_removal();
        }
        Ok(removed)
    }

    async fn clear(&self) -> CacheResult<()> {
        self.inner.invalidate_all();
        Ok(())
    }

    async fn len(&self) -> CacheResult<usize> {
        Ok(self.inner.entry_count() as usize)
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        let len = self.len().await?;
        Ok(self.stats.get_stats(len))
    }
}

/// Builder for Moka cache
pub struct MokaCacheBuilder<K, V> {
    max_capacity: Option<u64>,
    default_ttl: Option<Duration>,
    time_to_idle: Option<Duration>,
    _marker: std::marker::PhantomData<(K, V)>,
}

impl<K, V> MokaCacheBuilder<K, V>
where
    K: CacheKey + 'static,
    V: CacheValue + 'static,
{
    pub fn new() -> Self {
        Self {
            max_capacity: None,
            default_ttl: None,
            time_to_idle: None,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Lifetime applied by `put`; `put_with_ttl` overrides it per entry
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    pub fn time_to_idle(mut self, tti: Duration) -> Self {
        self.time_to_idle = Some(tti);
        self
    }

    pub fn build(self) -> MokaCache<K, V> {
        let mut builder = MokaInner::builder().expire_after(PerEntryExpiry);

        if let Some(capacity) = self.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        if let Some(tti) = self.time_to_idle {
            builder = builder.time_to_idle(tti);
        }

        MokaCache {
            inner: builder.build(),
            default_ttl: self.default_ttl,
            stats: create_stats_collector(),
        }
    }
}

impl<K, V> Default for MokaCacheBuilder<K, V>
where
    K: CacheKey + 'static,
    V: CacheValue + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_moka_basic() {
        let cache = MokaCache::new(10);

        cache.put("key1", "value1").await.unwrap();
        assert_eq!(cache.get(&"key1").await.unwrap(), Some("value1"));

        assert!(cache.remove(&"key1").await.unwrap());
        assert_eq!(cache.get(&"key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_moka_per_entry_ttl() {
        let cache = MokaCache::builder().max_capacity(10).build();

        cache
            .put_with_ttl("short", "value", Duration::from_millis(50))
            .await
            .unwrap();
        cache.put("long", "value").await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        cache.run_pending_tasks().await;

        assert_eq!(cache.get(&"short").await.unwrap(), None);
        assert_eq!(cache.get(&"long").await.unwrap(), Some("value"));
    }

    #[tokio::test]
    async fn test_moka_default_ttl() {
        let cache = MokaCache::builder()
            .max_capacity(10)
            .default_ttl(Duration::from_millis(50))
            .build();

        cache.put("key1", "value1").await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        cache.run_pending_tasks().await;

        assert_eq!(cache.get(&"key1").await.unwrap(), None);
    }
}

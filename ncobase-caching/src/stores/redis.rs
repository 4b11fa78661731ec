//! Redis-backed string cache shared between server instances

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

use crate::{
    cache::Cache,
    stats::{create_stats_collector, SharedStatsCollector},
    CacheError, CacheResult, CacheStats,
};

/// Keys are stored as given. `prefix` scopes `clear` and `len` to the keys
/// under `<prefix>:`, so several deployments can share one database.
pub struct RedisCache {
    conn: ConnectionManager,
    prefix: String,
    default_ttl: Duration,
    stats: SharedStatsCollector,
}

impl RedisCache {
    /// Connect to `redis_url` and build a cache on top of a managed connection
    pub async fn connect(redis_url: &str, prefix: impl Into<String>, default_ttl: Duration) -> CacheResult<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| CacheError::InvalidConfiguration(format!("Invalid redis URL: {}", e)))?;
        let conn = ConnectionManager::new(client).await?;

        tracing::info!("Connected to redis cache at {}", redis_url);

        Ok(Self {
            conn,
            prefix: prefix.into(),
            default_ttl,
            stats: create_stats_collector(),
        })
    }

    async fn scan_keys(&self) -> CacheResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}:*", self.prefix);
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(500)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(keys)
    }

    fn track<T>(&self, result: CacheResult<T>) -> CacheResult<T> {
        if result.is_err() {
            self.stats.record_error();
        }
        result
    }
}

#[async_trait]
impl Cache<String, String> for RedisCache {
    async fn get(&self, key: &String) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        let result: CacheResult<Option<String>> = conn.get(key).await.map_err(CacheError::from);
        let value = self.track(result)?;

        if value.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        Ok(value)
    }

    async fn put(&self, key: String, value: String) -> CacheResult<()> {
        self.put_with_ttl(key, value, self.default_ttl).await
    }

    async fn put_with_ttl(&self, key: String, value: String, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let seconds = ttl.as_secs().max(1);
        let result: CacheResult<()> = conn
            .set_ex(&key, value, seconds)
            .await
            .map_err(CacheError::from);
        self.track(result)?;
        self.stats.record_put();
        Ok(())
    }

    async fn remove(&self, key: &String) -> CacheResult<bool> {
        let mut conn = self.conn.clone();
        let result: CacheResult<u64> = conn.del(key).await.map_err(CacheError::from);
        let removed = self.track(result)? > 0;
        if removed {
            self.stats.record_removal();
        }
        Ok(removed)
    }

    async fn clear(&self) -> CacheResult<()> {
        let keys = self.scan_keys().await?;
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        let result: CacheResult<u64> = conn.del(keys).await.map_err(CacheError::from);
        self.track(result)?;
        Ok(())
    }

    async fn len(&self) -> CacheResult<usize> {
        Ok(self.scan_keys().await?.len())
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        // entry counting would require a full SCAN on every stats call
        Ok(self.stats.get_stats(0))
    }
}

//! Generic cache-aside component
//!
//! Reads check the cache first and fall back to the backing store; writes go
//! to the store and then populate or invalidate the cache. The cache is
//! best-effort: every failure here is logged at debug level and swallowed,
//! and a missed invalidation is corrected by TTL expiry.

use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::cache::Cache;
use crate::config::{CachePolicy, InvalidationMode};

/// String-keyed, string-valued store every cache-aside namespace shares
pub type SharedStringCache = Arc<dyn Cache<String, String>>;

enum CacheOp {
    Put { key: String, raw: String, ttl: Duration },
    Remove { keys: Vec<String> },
}

async fn apply(backend: SharedStringCache, op: CacheOp) {
    match op {
        CacheOp::Put { key, raw, ttl } => {
            if let Err(e) = backend.put_with_ttl(key.clone(), raw, ttl).await {
                debug!("cache populate failed for {}: {}", key, e);
            }
        }
        CacheOp::Remove { keys } => {
            for key in keys {
                if let Err(e) = backend.remove(&key).await {
                    debug!("cache invalidation failed for {}: {}", key, e);
                }
            }
        }
    }
}

/// Cache-aside access to one namespace of JSON-encoded values
pub struct CacheAside<V> {
    backend: Option<SharedStringCache>,
    namespace: Arc<str>,
    policy: CachePolicy,
    _marker: PhantomData<fn() -> V>,
}

impl<V> Clone for CacheAside<V> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            namespace: self.namespace.clone(),
            policy: self.policy,
            _marker: PhantomData,
        }
    }
}

impl<V> CacheAside<V>
where
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(backend: SharedStringCache, namespace: impl Into<String>, policy: CachePolicy) -> Self {
        Self {
            backend: Some(backend),
            namespace: Arc::from(namespace.into()),
            policy,
            _marker: PhantomData,
        }
    }

    /// A namespace that never caches; every read goes to the store
    pub fn disabled(namespace: impl Into<String>) -> Self {
        Self {
            backend: None,
            namespace: Arc::from(namespace.into()),
            policy: CachePolicy::default(),
            _marker: PhantomData,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn key(&self, id: &str) -> String {
        format!("{}:{}", self.namespace, id)
    }

    /// Cached value for `id`, or `None` on miss or any cache failure
    pub async fn get(&self, id: &str) -> Option<V> {
        let backend = self.backend.as_ref()?;
        let key = self.key(id);

        match backend.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<V>(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!("dropping undecodable cache entry {}: {}", key, e);
                    let _ = backend.remove(&key).await;
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                debug!("cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Store `value` under `id` according to the invalidation mode
    pub async fn set(&self, id: &str, value: &V) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        let key = self.key(id);
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("cache encode failed for {}: {}", key, e);
                return;
            }
        };
        self.dispatch(
            backend.clone(),
            CacheOp::Put {
                key,
                raw,
                ttl: self.policy.ttl,
            },
        )
        .await;
    }

    /// Drop the entries for every id given
    pub async fn invalidate(&self, ids: &[&str]) {
        let keys = ids.iter().map(|id| self.key(id)).collect();
        self.remove_keys(keys).await;
    }

    /// Drop fully-qualified keys, possibly from other namespaces sharing the
    /// same backend, as one unit
    pub async fn remove_keys(&self, keys: Vec<String>) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        if keys.is_empty() {
            return;
        }
        self.dispatch(backend.clone(), CacheOp::Remove { keys }).await;
    }

    /// Read through the cache, loading from the store on a miss.
    ///
    /// Store errors propagate unchanged; the cache is never used as a
    /// fallback for a failing store.
    pub async fn get_or_load<F, Fut, E>(&self, id: &str, loader: F) -> Result<Option<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<V>, E>>,
    {
        if let Some(hit) = self.get(id).await {
            return Ok(Some(hit));
        }
        let loaded = loader().await?;
        if let Some(value) = &loaded {
            self.set(id, value).await;
        }
        Ok(loaded)
    }

    async fn dispatch(&self, backend: SharedStringCache, op: CacheOp) {
        match self.policy.mode {
            InvalidationMode::Sync => apply(backend, op).await,
            InvalidationMode::Async => {
                tokio::spawn(apply(backend, op));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CacheError, CacheResult, CacheStats, TtlCache};
    use async_trait::async_trait;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        id: String,
        name: String,
    }

    fn memory_backend() -> SharedStringCache {
        Arc::new(TtlCache::<String, String>::new(Duration::from_secs(60)))
    }

    fn sync_aside(backend: SharedStringCache) -> CacheAside<Record> {
        CacheAside::new(
            backend,
            "test:record",
            CachePolicy::hours(1).with_mode(InvalidationMode::Sync),
        )
    }

    struct FailingCache;

    #[async_trait]
    impl Cache<String, String> for FailingCache {
        async fn get(&self, _key: &String) -> CacheResult<Option<String>> {
            Err(CacheError::ConnectionError("down".to_string()))
        }
        async fn put(&self, _key: String, _value: String) -> CacheResult<()> {
            Err(CacheError::ConnectionError("down".to_string()))
        }
        async fn put_with_ttl(&self, _key: String, _value: String, _ttl: Duration) -> CacheResult<()> {
            Err(CacheError::ConnectionError("down".to_string()))
        }
        async fn remove(&self, _key: &String) -> CacheResult<bool> {
            Err(CacheError::ConnectionError("down".to_string()))
        }
        async fn clear(&self) -> CacheResult<()> {
            Ok(())
        }
        async fn len(&self) -> CacheResult<usize> {
            Ok(0)
        }
        async fn stats(&self) -> CacheResult<CacheStats> {
            Ok(CacheStats::default())
        }
    }

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let aside = sync_aside(memory_backend());
        let record = Record {
            id: "r1".to_string(),
            name: "first".to_string(),
        };
        aside.set("r1", &record).await;
        assert_eq!(aside.get("r1").await, Some(record));
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let aside = sync_aside(memory_backend());
        let record = Record {
            id: "r1".to_string(),
            name: "first".to_string(),
        };
        aside.set("r1", &record).await;
        aside.invalidate(&["r1"]).await;
        assert_eq!(aside.get("r1").await, None);
    }

    #[tokio::test]
    async fn test_get_or_load_populates_on_miss() {
        let aside = sync_aside(memory_backend());
        let loaded: Result<Option<Record>, String> = aside
            .get_or_load("r2", || async {
                Ok(Some(Record {
                    id: "r2".to_string(),
                    name: "loaded".to_string(),
                }))
            })
            .await;
        assert!(loaded.unwrap().is_some());

        // second read must not hit the loader
        let cached: Result<Option<Record>, String> = aside
            .get_or_load("r2", || async { Err("store should not be called".to_string()) })
            .await;
        assert_eq!(cached.unwrap().unwrap().name, "loaded");
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let aside = sync_aside(memory_backend());
        let result: Result<Option<Record>, String> =
            aside.get_or_load("missing", || async { Err("db down".to_string()) }).await;
        assert_eq!(result.unwrap_err(), "db down");
    }

    #[tokio::test]
    async fn test_cache_failures_are_swallowed() {
        let aside = sync_aside(Arc::new(FailingCache));
        let record = Record {
            id: "r3".to_string(),
            name: "x".to_string(),
        };
        aside.set("r3", &record).await;
        aside.invalidate(&["r3"]).await;
        let loaded: Result<Option<Record>, String> =
            aside.get_or_load("r3", || async { Ok(Some(record.clone())) }).await;
        assert_eq!(loaded.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let backend = memory_backend();
        backend
            .put("test:record:bad".to_string(), "not json".to_string())
            .await
            .unwrap();
        let aside = sync_aside(backend.clone());
        assert_eq!(aside.get("bad").await, None);
        assert_eq!(backend.get(&"test:record:bad".to_string()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_async_mode_is_eventually_consistent() {
        let aside: CacheAside<Record> = CacheAside::new(memory_backend(), "test:record", CachePolicy::hours(1));
        let record = Record {
            id: "r4".to_string(),
            name: "async".to_string(),
        };
        aside.set("r4", &record).await;

        let mut seen = None;
        for _ in 0..50 {
            seen = aside.get("r4").await;
            if seen.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(seen, Some(record));
    }

    #[tokio::test]
    async fn test_disabled_never_caches() {
        let aside: CacheAside<Record> = CacheAside::disabled("test:record");
        let record = Record {
            id: "r5".to_string(),
            name: "x".to_string(),
        };
        aside.set("r5", &record).await;
        assert!(!aside.is_enabled());
        assert_eq!(aside.get("r5").await, None);
    }
}

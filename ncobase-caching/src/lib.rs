//! Caching layer for ncobase
//!
//! Store implementations behind one [`Cache`] trait, plus the cache-aside
//! component repositories use to front their tables.

pub mod aside;
pub mod cache;
pub mod config;
pub mod errors;
pub mod relation;
pub mod stats;
pub mod stores;

pub use aside::{CacheAside, SharedStringCache};
pub use cache::{Cache, CacheEntry, CacheKey, CacheValue};
pub use config::{CachePolicy, InvalidationMode};
pub use errors::{CacheError, CacheResult};
pub use relation::RelationCache;
pub use stats::CacheStats;

#[cfg(feature = "moka")]
pub use stores::MokaCache;
#[cfg(feature = "redis")]
pub use stores::RedisCache;
#[cfg(feature = "ttl")]
pub use stores::TtlCache;

use std::sync::Arc;
use std::time::Duration;

/// Which store backs the cache-aside namespaces
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOptions {
    /// No caching; every read goes to the database
    Disabled,
    #[cfg(feature = "ttl")]
    Memory { default_ttl: Duration },
    #[cfg(feature = "moka")]
    Moka { max_capacity: u64 },
    #[cfg(feature = "redis")]
    Redis {
        url: String,
        prefix: String,
        default_ttl: Duration,
    },
}

/// Build the shared string store, or `None` when caching is disabled
pub async fn create_string_cache(options: &BackendOptions) -> CacheResult<Option<SharedStringCache>> {
    let cache: SharedStringCache = match options {
        BackendOptions::Disabled => return Ok(None),
        #[cfg(feature = "ttl")]
        BackendOptions::Memory { default_ttl } => {
            let cache = Arc::new(TtlCache::<String, String>::new(*default_ttl));
            cache.clone().start_cleanup_task(Duration::from_secs(60));
            cache
        }
        #[cfg(feature = "moka")]
        BackendOptions::Moka { max_capacity } => Arc::new(MokaCache::<String, String>::new(*max_capacity)),
        #[cfg(feature = "redis")]
        BackendOptions::Redis {
            url,
            prefix,
            default_ttl,
        } => Arc::new(RedisCache::connect(url, prefix.clone(), *default_ttl).await?),
    };
    Ok(Some(cache))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_backend_builds_nothing() {
        assert!(create_string_cache(&BackendOptions::Disabled).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_moka_backend_round_trip() {
        let cache = create_string_cache(&BackendOptions::Moka { max_capacity: 100 })
            .await
            .unwrap()
            .unwrap();
        cache.put("k".to_string(), "v".to_string()).await.unwrap();
        assert_eq!(cache.get(&"k".to_string()).await.unwrap(), Some("v".to_string()));
    }
}

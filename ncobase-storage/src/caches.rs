//! Cache namespaces used by the repositories

use ncobase_caching::{CacheAside, CachePolicy, InvalidationMode, RelationCache, SharedStringCache};
use ncobase_config::CacheConfig;
use serde::{de::DeserializeOwned, Serialize};

/// TTL and invalidation mode per entity class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachePolicies {
    pub tenant: CachePolicy,
    pub setting: CachePolicy,
    pub quota: CachePolicy,
    pub billing: CachePolicy,
    pub relation: CachePolicy,
    pub user_tenant: CachePolicy,
}

impl Default for CachePolicies {
    fn default() -> Self {
        Self {
            tenant: CachePolicy::hours(4),
            setting: CachePolicy::hours(3),
            quota: CachePolicy::hours(2),
            billing: CachePolicy::hours(2),
            relation: CachePolicy::hours(2),
            user_tenant: CachePolicy::hours(2),
        }
    }
}

impl CachePolicies {
    pub fn from_config(config: &CacheConfig) -> Self {
        let mode = config.invalidation_mode.parse().unwrap_or_default();
        Self {
            tenant: CachePolicy::new(config.ttl.tenant, mode),
            setting: CachePolicy::new(config.ttl.setting, mode),
            quota: CachePolicy::new(config.ttl.quota, mode),
            billing: CachePolicy::new(config.ttl.billing, mode),
            relation: CachePolicy::new(config.ttl.relation, mode),
            user_tenant: CachePolicy::new(config.ttl.user_tenant, mode),
        }
    }

    pub fn with_mode(self, mode: InvalidationMode) -> Self {
        Self {
            tenant: self.tenant.with_mode(mode),
            setting: self.setting.with_mode(mode),
            quota: self.quota.with_mode(mode),
            billing: self.billing.with_mode(mode),
            relation: self.relation.with_mode(mode),
            user_tenant: self.user_tenant.with_mode(mode),
        }
    }
}

/// Shared backend plus the key prefix every namespace hangs off
#[derive(Clone)]
pub struct StorageCaches {
    backend: Option<SharedStringCache>,
    prefix: String,
    policies: CachePolicies,
}

impl StorageCaches {
    pub fn new(backend: Option<SharedStringCache>, prefix: impl Into<String>, policies: CachePolicies) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
            policies,
        }
    }

    /// Every read goes to the database
    pub fn disabled() -> Self {
        Self::new(None, "ncobase", CachePolicies::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn policies(&self) -> &CachePolicies {
        &self.policies
    }

    /// Namespace `<prefix>:<entity>`
    pub fn aside<V>(&self, entity: &str, policy: CachePolicy) -> CacheAside<V>
    where
        V: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let namespace = format!("{}:{}", self.prefix, entity);
        match &self.backend {
            Some(backend) => CacheAside::new(backend.clone(), namespace, policy),
            None => CacheAside::disabled(namespace),
        }
    }

    /// Pair, forward and reverse namespaces for a link table
    pub fn relation(&self, table: &str) -> RelationCache {
        let prefix = format!("{}:{}", self.prefix, table);
        match &self.backend {
            Some(backend) => RelationCache::new(backend.clone(), &prefix, self.policies.relation),
            None => RelationCache::disabled(&prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_policies_follow_config() {
        let mut config = CacheConfig::default();
        config.invalidation_mode = "sync".to_string();
        config.ttl.tenant = Duration::from_secs(60);

        let policies = CachePolicies::from_config(&config);
        assert_eq!(policies.tenant.ttl, Duration::from_secs(60));
        assert_eq!(policies.tenant.mode, InvalidationMode::Sync);
        assert_eq!(policies.setting.ttl, Duration::from_secs(3 * 3600));
    }

    #[test]
    fn test_namespaces_carry_prefix() {
        let caches = StorageCaches::disabled();
        let aside: CacheAside<String> = caches.aside("tenant", caches.policies().tenant);
        assert_eq!(aside.key("t1"), "ncobase:tenant:t1");
        assert!(!aside.is_enabled());
    }
}

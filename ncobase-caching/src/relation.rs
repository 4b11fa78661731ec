//! Caching for many-to-many link tables
//!
//! Each link table keeps three views: the existence of one `(left, right)`
//! pair, the right-hand ids for a left id, and the left-hand ids for a right
//! id. Any write to a link drops all three for the affected ids together.

use crate::aside::{CacheAside, SharedStringCache};
use crate::config::CachePolicy;

#[derive(Clone)]
pub struct RelationCache {
    pair: CacheAside<bool>,
    forward: CacheAside<Vec<String>>,
    reverse: CacheAside<Vec<String>>,
}

impl RelationCache {
    /// `prefix` names the link table, e.g. `ncobase:tenant_group`
    pub fn new(backend: SharedStringCache, prefix: &str, policy: CachePolicy) -> Self {
        Self {
            pair: CacheAside::new(backend.clone(), format!("{}:pair", prefix), policy),
            forward: CacheAside::new(backend.clone(), format!("{}:forward", prefix), policy),
            reverse: CacheAside::new(backend, format!("{}:reverse", prefix), policy),
        }
    }

    pub fn disabled(prefix: &str) -> Self {
        Self {
            pair: CacheAside::disabled(format!("{}:pair", prefix)),
            forward: CacheAside::disabled(format!("{}:forward", prefix)),
            reverse: CacheAside::disabled(format!("{}:reverse", prefix)),
        }
    }

    fn pair_id(left: &str, right: &str) -> String {
        format!("{}:{}", left, right)
    }

    pub async fn get_pair(&self, left: &str, right: &str) -> Option<bool> {
        self.pair.get(&Self::pair_id(left, right)).await
    }

    pub async fn set_pair(&self, left: &str, right: &str, exists: bool) {
        self.pair.set(&Self::pair_id(left, right), &exists).await;
    }

    pub async fn get_forward(&self, left: &str) -> Option<Vec<String>> {
        self.forward.get(left).await
    }

    pub async fn set_forward(&self, left: &str, ids: &[String]) {
        self.forward.set(left, &ids.to_vec()).await;
    }

    pub async fn get_reverse(&self, right: &str) -> Option<Vec<String>> {
        self.reverse.get(right).await
    }

    pub async fn set_reverse(&self, right: &str, ids: &[String]) {
        self.reverse.set(right, &ids.to_vec()).await;
    }

    /// Drop the pair entry and both list entries touched by one link
    pub async fn invalidate(&self, left: &str, right: &str) {
        let keys = vec![
            self.pair.key(&Self::pair_id(left, right)),
            self.forward.key(left),
            self.reverse.key(right),
        ];
        self.pair.remove_keys(keys).await;
    }

    /// Drop everything cached for `left` after its links were bulk-removed
    pub async fn invalidate_left(&self, left: &str, rights: &[String]) {
        let mut keys = vec![self.forward.key(left)];
        for right in rights {
            keys.push(self.pair.key(&Self::pair_id(left, right)));
            keys.push(self.reverse.key(right));
        }
        self.pair.remove_keys(keys).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InvalidationMode, TtlCache};
    use std::sync::Arc;
    use std::time::Duration;

    fn cache() -> RelationCache {
        let backend: SharedStringCache = Arc::new(TtlCache::<String, String>::new(Duration::from_secs(60)));
        RelationCache::new(
            backend,
            "test:tenant_group",
            CachePolicy::hours(2).with_mode(InvalidationMode::Sync),
        )
    }

    #[tokio::test]
    async fn test_invalidate_drops_all_views() {
        let cache = cache();
        cache.set_pair("t1", "g1", true).await;
        cache.set_forward("t1", &["g1".to_string()]).await;
        cache.set_reverse("g1", &["t1".to_string()]).await;

        cache.invalidate("t1", "g1").await;

        assert_eq!(cache.get_pair("t1", "g1").await, None);
        assert_eq!(cache.get_forward("t1").await, None);
        assert_eq!(cache.get_reverse("g1").await, None);
    }

    #[tokio::test]
    async fn test_invalidate_leaves_unrelated_entries() {
        let cache = cache();
        cache.set_forward("t2", &["g9".to_string()]).await;
        cache.invalidate("t1", "g1").await;
        assert_eq!(cache.get_forward("t2").await, Some(vec!["g9".to_string()]));
    }

    #[tokio::test]
    async fn test_invalidate_left_drops_reverse_lists() {
        let cache = cache();
        cache.set_forward("t1", &["g1".to_string(), "g2".to_string()]).await;
        cache.set_reverse("g1", &["t1".to_string()]).await;
        cache.set_reverse("g2", &["t1".to_string()]).await;

        cache.invalidate_left("t1", &["g1".to_string(), "g2".to_string()]).await;

        assert_eq!(cache.get_forward("t1").await, None);
        assert_eq!(cache.get_reverse("g1").await, None);
        assert_eq!(cache.get_reverse("g2").await, None);
    }
}

//! Cache-aside configuration

use crate::error::ConfigResult;
use crate::validation::{validate_enum_choice, validate_positive, validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Per-process map with TTL sweeping
    #[default]
    Memory,
    Moka,
    Redis,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "moka" => Ok(CacheBackend::Moka),
            "redis" => Ok(CacheBackend::Redis),
            _ => Err(format!("Invalid cache backend: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    #[serde(default = "crate::domains::utils::default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub backend: CacheBackend,

    /// Required when `backend` is `redis`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_url: Option<String>,

    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Entry bound for the moka backend
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,

    /// `async` populates and invalidates from detached tasks, `sync` awaits them
    #[serde(default = "default_invalidation_mode")]
    pub invalidation_mode: String,

    #[serde(default)]
    pub ttl: CacheTtlConfig,
}

/// Per-entity entry lifetimes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheTtlConfig {
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub tenant: Duration,
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub setting: Duration,
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub quota: Duration,
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub billing: Duration,
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub relation: Duration,
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub user_tenant: Duration,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        let hours = |h: u64| Duration::from_secs(h * 3600);
        Self {
            tenant: hours(4),
            setting: hours(3),
            quota: hours(2),
            billing: hours(2),
            relation: hours(2),
            user_tenant: hours(2),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheBackend::default(),
            redis_url: None,
            key_prefix: default_key_prefix(),
            max_capacity: default_max_capacity(),
            invalidation_mode: default_invalidation_mode(),
            ttl: CacheTtlConfig::default(),
        }
    }
}

impl Validatable for CacheConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.key_prefix, "key_prefix", self.domain_name())?;
        validate_enum_choice(
            &self.invalidation_mode,
            &["async", "sync"],
            "invalidation_mode",
            self.domain_name(),
        )?;
        validate_positive(self.max_capacity, "max_capacity", self.domain_name())?;

        let ttls = [
            ("ttl.tenant", self.ttl.tenant),
            ("ttl.setting", self.ttl.setting),
            ("ttl.quota", self.ttl.quota),
            ("ttl.billing", self.ttl.billing),
            ("ttl.relation", self.ttl.relation),
            ("ttl.user_tenant", self.ttl.user_tenant),
        ];
        for (field, ttl) in ttls {
            validate_positive(ttl.as_secs(), field, self.domain_name())?;
        }

        if self.enabled && self.backend == CacheBackend::Redis {
            match &self.redis_url {
                Some(url) => validate_url(url, "redis_url", self.domain_name())?,
                None => return Err(self.validation_error("redis_url is required for the redis backend")),
            }
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "cache"
    }
}

fn default_key_prefix() -> String {
    "ncobase".to_string()
}

fn default_max_capacity() -> u64 {
    10_000
}

fn default_invalidation_mode() -> String {
    "async".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls() {
        let ttl = CacheTtlConfig::default();
        assert_eq!(ttl.tenant, Duration::from_secs(4 * 3600));
        assert_eq!(ttl.setting, Duration::from_secs(3 * 3600));
        assert_eq!(ttl.quota, Duration::from_secs(2 * 3600));
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let mut config = CacheConfig {
            backend: CacheBackend::Redis,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.redis_url = Some("redis://127.0.0.1:6379".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_disabled_redis_needs_no_url() {
        let config = CacheConfig {
            enabled: false,
            backend: CacheBackend::Redis,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let config = CacheConfig {
            invalidation_mode: "eventually".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

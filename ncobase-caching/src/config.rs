//! Cache-aside policy knobs

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// When cache writes triggered by a repository operation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationMode {
    /// Detached task; the caller never waits and never sees the outcome.
    /// Readers may observe a stale entry until the task runs or the TTL
    /// expires.
    #[default]
    Async,
    /// Awaited before the repository call returns; a read that starts after
    /// the write completes never observes the pre-write value.
    Sync,
}

impl std::str::FromStr for InvalidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "async" => Ok(InvalidationMode::Async),
            "sync" => Ok(InvalidationMode::Sync),
            other => Err(format!("unknown invalidation mode '{}'", other)),
        }
    }
}

/// TTL and invalidation behaviour for one entity namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub mode: InvalidationMode,
}

impl CachePolicy {
    pub fn new(ttl: Duration, mode: InvalidationMode) -> Self {
        Self { ttl, mode }
    }

    pub fn hours(hours: u64) -> Self {
        Self::new(Duration::from_secs(hours * 3600), InvalidationMode::Async)
    }

    pub fn with_mode(mut self, mode: InvalidationMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::hours(2)
    }
}

//! Domain-driven configuration for the ncobase server
//!
//! Configuration is split by functional domain, each with its own defaults
//! and validation. YAML files and `NCOBASE_*` environment variables are both
//! supported; the environment wins.

pub mod domains;
pub mod error;
pub mod loader;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

pub use domains::{
    auth::AuthConfig,
    billing::BillingConfig,
    cache::{CacheBackend, CacheConfig, CacheTtlConfig},
    database::DatabaseConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    server::ServerConfig,
    system::SystemConfig,
    NcobaseConfig,
};

pub use domains::utils::serde_duration;

//! Configuration domains

pub mod auth;
pub mod billing;
pub mod cache;
pub mod database;
pub mod logging;
pub mod server;
pub mod system;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NcobaseConfig {
    pub server: server::ServerConfig,
    pub database: database::DatabaseConfig,
    pub cache: cache::CacheConfig,
    pub logging: logging::LoggingConfig,
    pub auth: auth::AuthConfig,
    pub billing: billing::BillingConfig,
    pub system: system::SystemConfig,
}

impl NcobaseConfig {
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.cache.validate()?;
        self.logging.validate()?;
        self.auth.validate()?;
        self.billing.validate()?;
        self.system.validate()?;
        Ok(())
    }

    /// Default configuration rendered as YAML
    pub fn generate_sample() -> String {
        serde_yaml::to_string(&NcobaseConfig::default())
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}

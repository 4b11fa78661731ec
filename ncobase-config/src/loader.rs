//! Configuration loading and environment variable handling

use crate::domains::{cache::CacheBackend, logging::LogFormat, logging::LogLevel, NcobaseConfig};
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Loads configuration from YAML and `<PREFIX>_*` environment variables
pub struct ConfigLoader {
    prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            prefix: "NCOBASE".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Load a YAML file, then apply environment overrides and validate
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<NcobaseConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: NcobaseConfig = serde_yaml::from_str(&content)?;
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env(&self) -> ConfigResult<NcobaseConfig> {
        let mut config = NcobaseConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<NcobaseConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    fn apply_env_overrides(&self, config: &mut NcobaseConfig) -> ConfigResult<()> {
        self.apply_server_overrides(config)?;
        self.apply_database_overrides(config)?;
        self.apply_cache_overrides(config)?;
        self.apply_logging_overrides(config)?;
        self.apply_auth_overrides(config)?;
        self.apply_billing_overrides(config)?;
        self.apply_system_overrides(config)?;
        Ok(())
    }

    fn apply_server_overrides(&self, config: &mut NcobaseConfig) -> ConfigResult<()> {
        if let Ok(bind) = self.get_env_var("SERVER_BIND_ADDRESS") {
            config.server.bind_address = bind;
        }
        if let Some(port) = self.parse_env_var("SERVER_PORT")? {
            config.server.port = port;
        }
        if let Some(enabled) = self.parse_env_var("SERVER_ENABLE_CORS")? {
            config.server.enable_cors = enabled;
        }
        Ok(())
    }

    fn apply_database_overrides(&self, config: &mut NcobaseConfig) -> ConfigResult<()> {
        if let Ok(url) = self.get_env_var("DATABASE_URL") {
            config.database.url = url;
        }
        if let Some(max) = self.parse_env_var("DATABASE_MAX_CONNECTIONS")? {
            config.database.max_connections = max;
        }
        Ok(())
    }

    fn apply_cache_overrides(&self, config: &mut NcobaseConfig) -> ConfigResult<()> {
        if let Some(enabled) = self.parse_env_var("CACHE_ENABLED")? {
            config.cache.enabled = enabled;
        }
        if let Some(backend) = self.parse_env_var::<CacheBackend>("CACHE_BACKEND")? {
            config.cache.backend = backend;
        }
        if let Ok(url) = self.get_env_var("REDIS_URL") {
            config.cache.redis_url = Some(url);
        }
        if let Ok(mode) = self.get_env_var("CACHE_INVALIDATION_MODE") {
            config.cache.invalidation_mode = mode.to_lowercase();
        }
        Ok(())
    }

    fn apply_logging_overrides(&self, config: &mut NcobaseConfig) -> ConfigResult<()> {
        if let Some(level) = self.parse_env_var::<LogLevel>("LOG_LEVEL")? {
            config.logging.level = level;
        }
        if let Some(format) = self.parse_env_var::<LogFormat>("LOG_FORMAT")? {
            config.logging.format = format;
        }
        Ok(())
    }

    fn apply_auth_overrides(&self, config: &mut NcobaseConfig) -> ConfigResult<()> {
        if let Ok(secret) = self.get_env_var("JWT_SECRET") {
            config.auth.jwt_secret = secret;
        }
        if let Some(protect) = self.parse_env_var("AUTH_PROTECT_READS")? {
            config.auth.protect_reads = protect;
        }
        Ok(())
    }

    fn apply_billing_overrides(&self, config: &mut NcobaseConfig) -> ConfigResult<()> {
        if let Some(days) = self.parse_env_var("BILLING_DUE_DAYS")? {
            config.billing.invoice_due_days = days;
        }
        if let Some(seconds) = self.parse_env_var::<u64>("OVERDUE_SWEEP_SECONDS")? {
            config.billing.overdue_sweep_interval = Duration::from_secs(seconds);
        }
        Ok(())
    }

    fn apply_system_overrides(&self, config: &mut NcobaseConfig) -> ConfigResult<()> {
        if let Some(auto) = self.parse_env_var("SYSTEM_AUTO_INITIALIZE")? {
            config.system.auto_initialize = auto;
        }
        if let Some(allow) = self.parse_env_var("SYSTEM_ALLOW_REINITIALIZATION")? {
            config.system.allow_reinitialization = allow;
        }
        Ok(())
    }

    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }

    /// `None` when unset, an error naming the variable when unparseable
    fn parse_env_var<T>(&self, name: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_env_var(name) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::EnvError(format!("Invalid {}_{}: {}", self.prefix, name, e))),
            Err(_) => Ok(None),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

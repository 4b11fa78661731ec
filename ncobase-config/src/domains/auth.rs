//! Bearer token authentication configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    #[serde(default = "default_issuer")]
    pub issuer: String,

    #[serde(default = "default_audience")]
    pub audience: String,

    #[serde(with = "crate::domains::utils::serde_duration", default = "default_token_expiry")]
    pub token_expiry: Duration,

    /// Require a token on read routes too; mutating routes always require one
    #[serde(default = "crate::domains::utils::default_false")]
    pub protect_reads: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            issuer: default_issuer(),
            audience: default_audience(),
            token_expiry: default_token_expiry(),
            protect_reads: false,
        }
    }
}

impl Validatable for AuthConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.jwt_secret, "jwt_secret", self.domain_name())?;
        validate_required_string(&self.issuer, "issuer", self.domain_name())?;
        validate_required_string(&self.audience, "audience", self.domain_name())?;
        validate_positive(self.token_expiry.as_secs(), "token_expiry", self.domain_name())?;

        if self.jwt_secret.len() < 32 {
            return Err(self.validation_error("jwt_secret must be at least 32 characters"));
        }
        if self.jwt_secret == default_jwt_secret() {
            tracing::warn!("Using the built-in JWT secret; set NCOBASE_JWT_SECRET in production");
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "auth"
    }
}

fn default_jwt_secret() -> String {
    "ncobase-development-secret-change-me".to_string()
}

fn default_issuer() -> String {
    "ncobase".to_string()
}

fn default_audience() -> String {
    "ncobase-api".to_string()
}

fn default_token_expiry() -> Duration {
    Duration::from_secs(24 * 3600)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_rejected() {
        let config = AuthConfig {
            jwt_secret: "short".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

//! System initialisation configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Run the seed sequencer at startup when the system is uninitialised
    #[serde(default = "crate::domains::utils::default_true")]
    pub auto_initialize: bool,

    /// Permit re-running the sequencer on an initialised system
    #[serde(default = "crate::domains::utils::default_false")]
    pub allow_reinitialization: bool,

    /// Password given to the seeded default accounts
    #[serde(default = "default_password")]
    pub default_password: String,

    /// Slug of the tenant created at initialisation
    #[serde(default = "default_tenant_slug")]
    pub default_tenant_slug: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            auto_initialize: true,
            allow_reinitialization: false,
            default_password: default_password(),
            default_tenant_slug: default_tenant_slug(),
        }
    }
}

impl Validatable for SystemConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.default_tenant_slug, "default_tenant_slug", self.domain_name())?;
        if self.default_password.len() < 8 {
            return Err(self.validation_error("default_password must be at least 8 characters"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "system"
    }
}

fn default_password() -> String {
    "Ac123456".to_string()
}

fn default_tenant_slug() -> String {
    "ncobase".to_string()
}

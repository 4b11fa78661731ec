//! Billing lifecycle configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Days between invoice generation and its due date
    #[serde(default = "default_invoice_due_days")]
    pub invoice_due_days: u32,

    /// ISO 4217 code used when a billing record omits one
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// How often the overdue sweep runs; zero disables it
    #[serde(with = "crate::domains::utils::serde_duration", default = "default_overdue_sweep_interval")]
    pub overdue_sweep_interval: Duration,
}

impl BillingConfig {
    pub fn sweep_enabled(&self) -> bool {
        !self.overdue_sweep_interval.is_zero()
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            invoice_due_days: default_invoice_due_days(),
            default_currency: default_currency(),
            overdue_sweep_interval: default_overdue_sweep_interval(),
        }
    }
}

impl Validatable for BillingConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.invoice_due_days, "invoice_due_days", self.domain_name())?;

        if self.default_currency.len() != 3 || !self.default_currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(self.validation_error(format!(
                "default_currency must be a three-letter uppercase code, got '{}'",
                self.default_currency
            )));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "billing"
    }
}

fn default_invoice_due_days() -> u32 {
    30
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_overdue_sweep_interval() -> Duration {
    Duration::from_secs(3600)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_must_be_iso_code() {
        let config = BillingConfig {
            default_currency: "usd".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(BillingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_interval_disables_sweep() {
        let config = BillingConfig {
            overdue_sweep_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(!config.sweep_enabled());
    }
}

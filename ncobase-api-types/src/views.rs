//! Service-level views: records decorated with values derived at read time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{TenantBilling, TenantQuota, TenantRelation, TenantSetting};
use crate::enums::{BillingStatus, QuotaType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadTenantQuota {
    #[serde(flatten)]
    pub quota: TenantQuota,
    pub utilization_percent: f64,
    pub is_exceeded: bool,
    pub remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadTenantBilling {
    #[serde(flatten)]
    pub billing: TenantBilling,
    /// Status as it should be presented now; a pending row past its due
    /// date reads as overdue even before the sweep has stored it.
    pub effective_status: BillingStatus,
    pub is_overdue: bool,
    pub days_overdue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadTenantSetting {
    #[serde(flatten)]
    pub setting: TenantSetting,
    pub parsed_value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadTenantRelation {
    #[serde(flatten)]
    pub relation: TenantRelation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
}

/// Minimal group record returned by the group lookup capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaCheckResult {
    pub tenant_id: String,
    pub quota_type: QuotaType,
    pub amount: i64,
    pub allowed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BillingSummary {
    pub tenant_id: String,
    pub currency: String,
    pub invoice_count: u64,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub paid_count: u64,
    pub pending_amount: f64,
    pub pending_count: u64,
    pub overdue_amount: f64,
    pub overdue_count: u64,
    /// pending + overdue
    pub outstanding_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Executed,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: String,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializationReport {
    pub steps: Vec<StepReport>,
    pub initialized_at: DateTime<Utc>,
}

impl InitializationReport {
    pub fn executed_steps(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::Executed)
            .map(|s| s.step.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializationStatus {
    pub initialized: bool,
    pub initialized_at: Option<DateTime<Utc>>,
}

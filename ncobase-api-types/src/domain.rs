//! Domain records as stored and cached
//!
//! These are the shapes repositories hand back. They carry provenance
//! (`created_by`, `updated_by`, `created_at`, `updated_at`) on every entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::{BillingPeriod, BillingStatus, QuotaType, QuotaUnit, RelationKind, SettingScope, SettingType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub tenant_type: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub logo: Option<String>,
    pub logo_alt: Option<String>,
    pub keywords: Vec<String>,
    pub copyright: Option<String>,
    pub description: Option<String>,
    pub disabled: bool,
    pub extras: Value,
    pub expired_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantQuota {
    pub id: String,
    pub tenant_id: String,
    pub quota_type: QuotaType,
    pub quota_name: String,
    pub max_value: i64,
    pub current_used: i64,
    pub unit: QuotaUnit,
    pub description: Option<String>,
    pub enabled: bool,
    pub extras: Value,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantBilling {
    pub id: String,
    pub tenant_id: String,
    pub billing_period: BillingPeriod,
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
    pub amount: f64,
    pub currency: String,
    pub status: BillingStatus,
    pub invoice_number: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub usage_details: Value,
    pub extras: Value,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantSetting {
    pub id: String,
    pub tenant_id: String,
    pub setting_key: String,
    pub setting_name: String,
    pub setting_value: String,
    pub default_value: Option<String>,
    pub setting_type: SettingType,
    pub scope: SettingScope,
    pub category: String,
    pub description: Option<String>,
    pub validation: Option<Value>,
    pub sort_order: i32,
    pub is_public: bool,
    pub is_required: bool,
    pub is_readonly: bool,
    pub extras: Value,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tenant join row for groups, menus, dictionaries or options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantRelation {
    pub id: String,
    pub kind: RelationKind,
    pub tenant_id: String,
    pub target_id: String,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTenant {
    pub id: String,
    pub user_id: String,
    pub tenant_id: String,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTenantRole {
    pub id: String,
    pub user_id: String,
    pub tenant_id: String,
    pub role_id: String,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

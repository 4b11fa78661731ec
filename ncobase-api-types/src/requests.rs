//! Request bodies accepted by the services and the REST layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use validator::Validate;

use crate::enums::{BillingPeriod, BillingStatus, QuotaType, QuotaUnit, SettingScope, SettingType};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateTenantBody {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 2, max = 64, message = "slug must be 2-64 characters"))]
    pub slug: String,
    pub tenant_type: Option<String>,
    #[validate(length(max = 255))]
    pub title: Option<String>,
    #[validate(url(message = "url must be a valid URL"))]
    pub url: Option<String>,
    pub logo: Option<String>,
    pub logo_alt: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub copyright: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub disabled: Option<bool>,
    pub extras: Option<Value>,
    pub expired_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTenantBody {
    #[validate(length(min = 1, max = 100, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 64, message = "slug must be 2-64 characters"))]
    pub slug: Option<String>,
    pub tenant_type: Option<String>,
    #[validate(length(max = 255))]
    pub title: Option<String>,
    #[validate(url(message = "url must be a valid URL"))]
    pub url: Option<String>,
    pub logo: Option<String>,
    pub logo_alt: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub copyright: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub disabled: Option<bool>,
    pub extras: Option<Value>,
    pub expired_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuotaBody {
    pub quota_type: QuotaType,
    #[validate(length(max = 100))]
    pub quota_name: Option<String>,
    #[validate(range(min = 0, message = "max_value cannot be negative"))]
    pub max_value: i64,
    #[validate(range(min = 0, message = "current_used cannot be negative"))]
    pub current_used: Option<i64>,
    pub unit: Option<QuotaUnit>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub extras: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateQuotaBody {
    #[validate(length(max = 100))]
    pub quota_name: Option<String>,
    #[validate(range(min = 0, message = "max_value cannot be negative"))]
    pub max_value: Option<i64>,
    #[validate(range(min = 0, message = "current_used cannot be negative"))]
    pub current_used: Option<i64>,
    pub unit: Option<QuotaUnit>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub extras: Option<Value>,
}

/// Relative change to a quota's usage counter
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuotaUsageBody {
    pub quota_type: QuotaType,
    pub delta: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuotaCheckBody {
    pub quota_type: QuotaType,
    #[validate(range(min = 0, message = "amount cannot be negative"))]
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBillingBody {
    #[serde(default)]
    pub billing_period: BillingPeriod,
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0, message = "amount cannot be negative"))]
    pub amount: f64,
    #[validate(length(equal = 3, message = "currency must be a 3 letter code"))]
    pub currency: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub invoice_number: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub usage_details: Option<Value>,
    pub extras: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBillingBody {
    #[validate(range(min = 0.0, message = "amount cannot be negative"))]
    pub amount: Option<f64>,
    #[validate(length(equal = 3, message = "currency must be a 3 letter code"))]
    pub currency: Option<String>,
    pub status: Option<BillingStatus>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub usage_details: Option<Value>,
    pub extras: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProcessPaymentBody {
    #[validate(length(min = 1, max = 50, message = "payment_method is required"))]
    pub payment_method: String,
    #[validate(length(max = 128))]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateInvoiceBody {
    #[serde(default)]
    pub billing_period: BillingPeriod,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateSettingBody {
    #[validate(length(min = 1, max = 100, message = "setting_key is required"))]
    pub setting_key: String,
    #[validate(length(max = 100))]
    pub setting_name: Option<String>,
    #[serde(default)]
    pub setting_value: String,
    pub default_value: Option<String>,
    pub setting_type: Option<SettingType>,
    pub scope: Option<SettingScope>,
    #[validate(length(max = 50))]
    pub category: Option<String>,
    pub description: Option<String>,
    pub validation: Option<Value>,
    pub sort_order: Option<i32>,
    pub is_public: Option<bool>,
    pub is_required: Option<bool>,
    pub is_readonly: Option<bool>,
    pub extras: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSettingBody {
    #[validate(length(max = 100))]
    pub setting_name: Option<String>,
    pub setting_value: Option<String>,
    pub default_value: Option<String>,
    pub setting_type: Option<SettingType>,
    pub scope: Option<SettingScope>,
    #[validate(length(max = 50))]
    pub category: Option<String>,
    pub description: Option<String>,
    pub validation: Option<Value>,
    pub sort_order: Option<i32>,
    pub is_public: Option<bool>,
    pub is_required: Option<bool>,
    pub is_readonly: Option<bool>,
    pub extras: Option<Value>,
}

/// Upsert a single setting by key with a typed JSON value
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetSettingBody {
    pub value: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BulkSettingsBody {
    pub settings: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddRelationBody {
    #[validate(length(min = 1, max = 64, message = "target_id is required"))]
    pub target_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddUserTenantBody {
    #[validate(length(min = 1, max = 64, message = "user_id is required"))]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignRoleBody {
    #[validate(length(min = 1, max = 64, message = "role_id is required"))]
    pub role_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct InitializeBody {
    #[serde(default)]
    pub allow_reinitialization: bool,
}

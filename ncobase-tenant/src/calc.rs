//! Values derived from stored rows at read time
//!
//! Everything here is pure and takes `now` explicitly so callers and tests
//! agree on a single clock reading per request.

use chrono::{DateTime, Months, Utc};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use ncobase_api_types::{
    BillingPeriod, BillingStatus, ReadTenantBilling, ReadTenantQuota, ReadTenantSetting, SettingType, TenantBilling,
    TenantQuota, TenantSetting,
};

/// Utilisation percentage and whether the ceiling is exceeded.
///
/// A non-positive ceiling reports 0% but still counts any usage as exceeded.
pub fn calculate_utilization(current_used: i64, max_value: i64) -> (f64, bool) {
    let exceeded = current_used > max_value;
    if max_value <= 0 {
        return (0.0, exceeded);
    }
    (current_used as f64 / max_value as f64 * 100.0, exceeded)
}

/// Whether consuming `amount` more units stays within the ceiling
pub fn within_limit(quota: &TenantQuota, amount: i64) -> bool {
    if !quota.enabled {
        return true;
    }
    quota
        .current_used
        .checked_add(amount)
        .is_some_and(|total| total <= quota.max_value)
}

pub fn read_quota(quota: TenantQuota) -> ReadTenantQuota {
    let (utilization_percent, is_exceeded) = calculate_utilization(quota.current_used, quota.max_value);
    let remaining = quota.max_value.saturating_sub(quota.current_used).max(0);
    ReadTenantQuota {
        quota,
        utilization_percent,
        is_exceeded,
        remaining,
    }
}

pub fn is_overdue(status: BillingStatus, due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match status {
        BillingStatus::Overdue => true,
        BillingStatus::Pending => due_date.is_some_and(|due| due < now),
        _ => false,
    }
}

/// Whole days since `due_date`; zero when not yet past due
pub fn days_overdue(due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match due_date {
        Some(due) if due < now => (now - due).num_days(),
        _ => 0,
    }
}

/// Status to present: pending rows past their due date read as overdue
pub fn effective_status(status: BillingStatus, due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> BillingStatus {
    if is_overdue(status, due_date, now) {
        BillingStatus::Overdue
    } else {
        status
    }
}

pub fn read_billing(billing: TenantBilling, now: DateTime<Utc>) -> ReadTenantBilling {
    let effective_status = effective_status(billing.status, billing.due_date, now);
    let is_overdue = effective_status == BillingStatus::Overdue;
    let days_overdue = if is_overdue {
        days_overdue(billing.due_date, now)
    } else {
        0
    };
    ReadTenantBilling {
        billing,
        effective_status,
        is_overdue,
        days_overdue,
    }
}

/// Billing window ending at `now` for a generated invoice
pub fn invoice_period(period: BillingPeriod, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let months = match period {
        BillingPeriod::Monthly | BillingPeriod::UsageBased => 1,
        BillingPeriod::Yearly => 12,
        BillingPeriod::OneTime => return (now, now),
    };
    let start = now.checked_sub_months(Months::new(months)).unwrap_or(now);
    (start, now)
}

/// `INV-YYYYMMDD-XXXXXXXX` with eight random hex digits
pub fn invoice_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("INV-{}-{}", now.format("%Y%m%d"), suffix[..8].to_uppercase())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Interpret a stored setting string according to its declared type.
///
/// Values that do not parse as their type come back as the raw string.
pub fn coerce_setting_value(setting_type: SettingType, raw: &str) -> Value {
    let coerced = match setting_type {
        SettingType::String => return Value::String(raw.to_string()),
        SettingType::Number => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .ok()
            .or_else(|| raw.trim().parse::<f64>().ok().and_then(|n| serde_json::Number::from_f64(n).map(Value::Number))),
        SettingType::Boolean => parse_bool(raw).map(Value::Bool),
        SettingType::Json => serde_json::from_str::<Value>(raw).ok(),
        SettingType::Array => serde_json::from_str::<Value>(raw).ok().filter(Value::is_array),
    };

    coerced.unwrap_or_else(|| {
        debug!("setting value {:?} is not a valid {}, returning it as a string", raw, setting_type);
        Value::String(raw.to_string())
    })
}

/// The value a setting resolves to, falling back to its default when empty
pub fn setting_value(setting: &TenantSetting) -> Value {
    let raw = match (&setting.default_value, setting.setting_value.is_empty()) {
        (Some(default), true) => default.as_str(),
        _ => setting.setting_value.as_str(),
    };
    coerce_setting_value(setting.setting_type, raw)
}

pub fn read_setting(setting: TenantSetting) -> ReadTenantSetting {
    let parsed_value = setting_value(&setting);
    ReadTenantSetting { setting, parsed_value }
}

/// Declared type for a setting first written from a JSON value
pub fn infer_setting_type(value: &Value) -> SettingType {
    match value {
        Value::Bool(_) => SettingType::Boolean,
        Value::Number(_) => SettingType::Number,
        Value::Array(_) => SettingType::Array,
        Value::Object(_) => SettingType::Json,
        Value::String(_) | Value::Null => SettingType::String,
    }
}

/// Storage form of a JSON setting value
pub fn encode_setting_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} value '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Implements `as_str`, `Display` and `FromStr` from one variant/string table,
/// keeping the wire form identical to the serde form.
macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaType {
    Users,
    Storage,
    ApiCalls,
    Projects,
    Custom,
}

string_enum!(QuotaType, "quota_type", {
    Users => "users",
    Storage => "storage",
    ApiCalls => "api_calls",
    Projects => "projects",
    Custom => "custom",
});

impl QuotaType {
    /// Ceiling and unit used when a quota row is created implicitly by a
    /// usage update.
    pub fn default_limit(&self) -> (i64, QuotaUnit) {
        match self {
            QuotaType::Users => (100, QuotaUnit::Count),
            QuotaType::Storage => (10 * 1024 * 1024 * 1024, QuotaUnit::Bytes),
            QuotaType::ApiCalls => (100_000, QuotaUnit::Count),
            QuotaType::Projects => (50, QuotaUnit::Count),
            QuotaType::Custom => (1_000, QuotaUnit::Count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuotaUnit {
    #[default]
    Count,
    Bytes,
    Mb,
    Gb,
    Tb,
}

string_enum!(QuotaUnit, "quota_unit", {
    Count => "count",
    Bytes => "bytes",
    Mb => "mb",
    Gb => "gb",
    Tb => "tb",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    #[default]
    Monthly,
    Yearly,
    OneTime,
    UsageBased,
}

string_enum!(BillingPeriod, "billing_period", {
    Monthly => "monthly",
    Yearly => "yearly",
    OneTime => "one_time",
    UsageBased => "usage_based",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
    Refunded,
}

string_enum!(BillingStatus, "billing_status", {
    Pending => "pending",
    Paid => "paid",
    Overdue => "overdue",
    Cancelled => "cancelled",
    Refunded => "refunded",
});

impl BillingStatus {
    /// Statuses from which a payment can be recorded
    pub fn accepts_payment(&self) -> bool {
        matches!(self, BillingStatus::Pending | BillingStatus::Overdue)
    }

    /// Whether a direct update may move a record from `self` to `next`.
    /// `paid` is only reached by recording a payment; `cancelled` and
    /// `refunded` are terminal.
    pub fn can_update_to(&self, next: BillingStatus) -> bool {
        if *self == next {
            return true;
        }
        match (self, next) {
            (_, BillingStatus::Paid) => false,
            (
                BillingStatus::Pending | BillingStatus::Overdue,
                BillingStatus::Pending | BillingStatus::Overdue | BillingStatus::Cancelled,
            ) => true,
            (BillingStatus::Paid, BillingStatus::Refunded) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    #[default]
    String,
    Number,
    Boolean,
    Json,
    Array,
}

string_enum!(SettingType, "setting_type", {
    String => "string",
    Number => "number",
    Boolean => "boolean",
    Json => "json",
    Array => "array",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SettingScope {
    System,
    #[default]
    Tenant,
    User,
    Feature,
}

string_enum!(SettingScope, "setting_scope", {
    System => "system",
    Tenant => "tenant",
    User => "user",
    Feature => "feature",
});

/// Kinds of plain tenant join rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Group,
    Menu,
    Dictionary,
    Option,
}

string_enum!(RelationKind, "relation_kind", {
    Group => "group",
    Menu => "menu",
    Dictionary => "dictionary",
    Option => "option",
});

impl RelationKind {
    /// Plural path segment used by the REST routes
    pub fn plural(&self) -> &'static str {
        match self {
            RelationKind::Group => "groups",
            RelationKind::Menu => "menus",
            RelationKind::Dictionary => "dictionaries",
            RelationKind::Option => "options",
        }
    }

    pub fn from_plural(segment: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.plural() == segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_form_matches_serde() {
        for quota_type in QuotaType::ALL {
            let json = serde_json::to_string(quota_type).unwrap();
            assert_eq!(json, format!("\"{}\"", quota_type.as_str()));
            assert_eq!(quota_type.as_str().parse::<QuotaType>().unwrap(), *quota_type);
        }
        for period in BillingPeriod::ALL {
            let json = serde_json::to_string(period).unwrap();
            assert_eq!(json, format!("\"{}\"", period.as_str()));
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "weekly".parse::<BillingPeriod>().unwrap_err();
        assert_eq!(err.kind, "billing_period");
        assert!("PAID".parse::<BillingStatus>().is_ok());
    }

    #[test]
    fn test_storage_default_is_ten_gib() {
        let (limit, unit) = QuotaType::Storage.default_limit();
        assert_eq!(limit, 10_737_418_240);
        assert_eq!(unit, QuotaUnit::Bytes);
    }

    #[test]
    fn test_relation_plural_lookup() {
        assert_eq!(RelationKind::from_plural("dictionaries"), Some(RelationKind::Dictionary));
        assert_eq!(RelationKind::from_plural("widgets"), None);
    }

    #[test]
    fn test_payment_acceptance() {
        assert!(BillingStatus::Pending.accepts_payment());
        assert!(BillingStatus::Overdue.accepts_payment());
        assert!(!BillingStatus::Paid.accepts_payment());
        assert!(!BillingStatus::Refunded.accepts_payment());
    }

    #[test]
    fn test_direct_update_transitions() {
        assert!(BillingStatus::Pending.can_update_to(BillingStatus::Cancelled));
        assert!(BillingStatus::Overdue.can_update_to(BillingStatus::Pending));
        assert!(BillingStatus::Paid.can_update_to(BillingStatus::Refunded));
        assert!(BillingStatus::Cancelled.can_update_to(BillingStatus::Cancelled));

        assert!(!BillingStatus::Pending.can_update_to(BillingStatus::Paid));
        assert!(!BillingStatus::Pending.can_update_to(BillingStatus::Refunded));
        assert!(!BillingStatus::Paid.can_update_to(BillingStatus::Pending));
        assert!(!BillingStatus::Cancelled.can_update_to(BillingStatus::Pending));
        assert!(!BillingStatus::Refunded.can_update_to(BillingStatus::Paid));
    }
}

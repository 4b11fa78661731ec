//! Service-level errors for the tenant module

use ncobase_api_types::BillingStatus;
use ncobase_interfaces::DatabaseError;
use thiserror::Error;

pub type TenantResult<T> = Result<T, TenantError>;

#[derive(Debug, Error)]
pub enum TenantError {
    /// Request body failed declarative validation
    #[error("Invalid request: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    /// A single field failed a rule checked by the service itself
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Conflict(String),

    #[error("Billing {id} is {status} and cannot become {target}")]
    InvalidTransition {
        id: String,
        status: BillingStatus,
        target: BillingStatus,
    },

    #[error("Setting '{0}' is read-only")]
    ReadOnly(String),

    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl TenantError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        TenantError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        TenantError::NotFound { entity, id: id.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TenantError::NotFound { .. })
    }
}

impl From<DatabaseError> for TenantError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => TenantError::NotFound {
                entity: entity_label(&entity),
                id,
            },
            DatabaseError::Constraint { message } => TenantError::Conflict(message),
            DatabaseError::Validation { message } => TenantError::Validation {
                field: "request".to_string(),
                message,
            },
            other => TenantError::Database(other),
        }
    }
}

fn entity_label(entity: &str) -> &'static str {
    match entity {
        "Tenant" => "Tenant",
        "TenantQuota" => "Quota",
        "TenantBilling" => "Billing",
        "TenantSetting" => "Setting",
        "UserTenant" => "Membership",
        "UserTenantRole" => "Role assignment",
        _ => "Record",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_errors_are_classified() {
        let err: TenantError = DatabaseError::not_found("Tenant", "t-1").into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Tenant 't-1' not found");

        let err: TenantError = DatabaseError::Constraint {
            message: "duplicate slug".to_string(),
        }
        .into();
        assert!(matches!(err, TenantError::Conflict(_)));

        let err: TenantError = DatabaseError::Connection {
            message: "refused".to_string(),
        }
        .into();
        assert!(matches!(err, TenantError::Database(_)));
    }

    #[test]
    fn test_transition_message_names_status() {
        let err = TenantError::InvalidTransition {
            id: "b-1".to_string(),
            status: BillingStatus::Cancelled,
            target: BillingStatus::Pending,
        };
        assert_eq!(err.to_string(), "Billing b-1 is cancelled and cannot become pending");
    }
}

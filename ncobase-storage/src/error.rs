//! Storage error types and sea-orm error mapping

use ncobase_interfaces::DatabaseError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

/// Errors raised while connecting or migrating
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DbError(#[from] DbErr),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for DatabaseError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DbError(e) => map_db_error("reach database", e),
            other => DatabaseError::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Map a sea-orm error raised while trying to `action`, logging it once here
pub(crate) fn map_db_error(action: &str, err: DbErr) -> DatabaseError {
    error!("Failed to {}: {}", action, err);

    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            return DatabaseError::Constraint {
                message: format!("Failed to {}: duplicate key ({})", action, detail),
            }
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            return DatabaseError::Constraint {
                message: format!("Failed to {}: missing reference ({})", action, detail),
            }
        }
        _ => {}
    }

    match err {
        DbErr::Conn(e) => DatabaseError::Connection {
            message: format!("Failed to {}: {}", action, e),
        },
        DbErr::ConnectionAcquire(e) => DatabaseError::Connection {
            message: format!("Failed to {}: {}", action, e),
        },
        other => DatabaseError::Internal {
            message: format!("Failed to {}: {}", action, other),
        },
    }
}

/// A stored value that no longer parses into its domain type
pub(crate) fn corrupt_row(entity: &str, id: &str, detail: impl std::fmt::Display) -> DatabaseError {
    DatabaseError::Internal {
        message: format!("Corrupt {} row {}: {}", entity, id, detail),
    }
}

/// True when `err` is a unique index violation
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_errors_carry_operation_tag() {
        let err = map_db_error("update tenant", DbErr::Custom("boom".to_string()));
        assert!(matches!(
            err,
            DatabaseError::Internal { ref message } if message == "Failed to update tenant: Custom Error: boom"
        ));
    }

    #[test]
    fn test_corrupt_row_names_entity() {
        let err = corrupt_row("quota", "q-1", "invalid quota_type value 'x'");
        assert!(err.to_string().contains("Corrupt quota row q-1"));
    }
}

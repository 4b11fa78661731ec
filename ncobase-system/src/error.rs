//! Errors raised while seeding

use ncobase_interfaces::DatabaseError;
use ncobase_storage::sea_orm::DbErr;
use thiserror::Error;

pub type SystemResult<T> = Result<T, SystemError>;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("System is already initialized")]
    AlreadyInitialized,

    /// A seed step failed; steps before it stay committed
    #[error("Initialization step '{step}' failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: StepError,
    },

    #[error("Failed to access system state: {0}")]
    State(#[from] DbErr),
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Repository error: {0}")]
    Repository(#[from] DatabaseError),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// An earlier step did not leave behind what this one needs
    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(String),
}

impl StepError {
    pub fn missing(what: impl Into<String>) -> Self {
        StepError::MissingPrerequisite(what.into())
    }
}

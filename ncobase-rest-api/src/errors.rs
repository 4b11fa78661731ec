//! REST error type and the failure envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ncobase_api_types::ApiError;
use ncobase_system::SystemError;
use ncobase_tenant::TenantError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum RestError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Invalid request: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Tenant(#[from] TenantError),

    #[error(transparent)]
    System(#[from] SystemError),
}

pub type RestResult<T> = Result<T, RestError>;

impl RestError {
    pub fn to_api_error(&self) -> ApiError {
        match self {
            RestError::NotFound(msg) => ApiError::new("NOT_FOUND", msg.clone()),
            RestError::BadRequest(msg) => ApiError::bad_request(msg.clone()),
            RestError::Unauthorized(msg) => ApiError::unauthorized(msg.clone()),
            RestError::ServiceUnavailable(msg) => ApiError::service_unavailable(msg.clone()),
            RestError::InternalError(msg) => ApiError::internal_error(msg.clone()),
            RestError::InvalidInput(errors) => ApiError::from(errors.clone()),
            RestError::Tenant(err) => tenant_error(err),
            RestError::System(err) => match err {
                SystemError::AlreadyInitialized => ApiError::conflict(err.to_string()),
                _ => ApiError::internal_error(err.to_string()),
            },
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        RestError::NotFound(format!("{} '{}' not found", resource, id))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        RestError::Unauthorized(message.into())
    }
}

fn tenant_error(err: &TenantError) -> ApiError {
    match err {
        TenantError::InvalidInput(errors) => ApiError::from(errors.clone()),
        TenantError::Validation { field, message } => ApiError::validation_error(field, message.clone()),
        TenantError::NotFound { .. } => ApiError::new("NOT_FOUND", err.to_string()),
        TenantError::Conflict(_) | TenantError::InvalidTransition { .. } => ApiError::conflict(err.to_string()),
        TenantError::ReadOnly(_) => ApiError::forbidden(err.to_string()),
        TenantError::Database(_) => ApiError::internal_error(err.to_string()),
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let api_error = self.to_api_error();
        let status =
            StatusCode::from_u16(api_error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = json!({
            "code": status.as_u16(),
            "message": api_error.message,
            "errors": api_error.errors,
        });
        (status, Json(body)).into_response()
    }
}

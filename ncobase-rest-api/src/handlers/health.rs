//! Liveness and readiness

use axum::extract::State;

use crate::{
    context::ApiContext,
    errors::{RestError, RestResult},
    models::{ApiResponse, HealthResponse},
};

pub async fn health_check() -> ApiResponse<HealthResponse> {
    ApiResponse::ok(HealthResponse::healthy())
}

/// Pings the database through the repositories
pub async fn readiness_check(State(ctx): State<ApiContext>) -> RestResult<ApiResponse<HealthResponse>> {
    ctx.repositories
        .health_check()
        .await
        .map_err(|e| RestError::ServiceUnavailable(e.to_string()))?;
    Ok(ApiResponse::ok(HealthResponse::healthy()))
}

//! System initialization

use axum::extract::State;
use ncobase_api_types::{InitializationReport, InitializationStatus, InitializeBody};
use tracing::{info, warn};

use crate::{
    auth::Actor,
    context::ApiContext,
    errors::RestResult,
    extractors::ValidJson,
    models::ApiResponse,
};

/// Run the seed steps. Re-running over an initialized database needs both the
/// request flag and `system.allow_reinitialization` in config.
pub async fn initialize(
    State(ctx): State<ApiContext>,
    actor: Actor,
    ValidJson(body): ValidJson<InitializeBody>,
) -> RestResult<ApiResponse<InitializationReport>> {
    if body.allow_reinitialization && !ctx.allow_reinitialization {
        warn!("Reinitialization requested by {:?} but disabled in config", actor.id());
    }
    let allow = body.allow_reinitialization && ctx.allow_reinitialization;

    let report = ctx.initializer.execute(allow).await?;
    info!("System initialized by {:?}", actor.id());
    Ok(ApiResponse::ok(report))
}

pub async fn status(State(ctx): State<ApiContext>) -> RestResult<ApiResponse<InitializationStatus>> {
    Ok(ApiResponse::ok(ctx.initializer.status().await?))
}

//! Tenant CRUD

use axum::extract::{Path, State};
use ncobase_api_types::{CreateTenantBody, Tenant, UpdateTenantBody};
use tracing::info;

use crate::{
    auth::Actor,
    context::ApiContext,
    errors::RestResult,
    extractors::{ApiQuery, ValidJson},
    models::{ApiResponse, CursorQuery},
};

pub async fn list_tenants(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<CursorQuery>,
) -> RestResult<ApiResponse<Vec<Tenant>>> {
    let page = ctx.services.tenants.list(query.into()).await?;
    Ok(ApiResponse::page(page))
}

pub async fn create_tenant(
    State(ctx): State<ApiContext>,
    actor: Actor,
    ValidJson(body): ValidJson<CreateTenantBody>,
) -> RestResult<ApiResponse<Tenant>> {
    let tenant = ctx.services.tenants.create(body, actor.id()).await?;
    info!("Tenant {} created by {:?}", tenant.slug, actor.id());
    Ok(ApiResponse::created(tenant))
}

pub async fn get_tenant(State(ctx): State<ApiContext>, Path(tenant): Path<String>) -> RestResult<ApiResponse<Tenant>> {
    Ok(ApiResponse::ok(ctx.services.tenants.get(&tenant).await?))
}

pub async fn update_tenant(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
    actor: Actor,
    ValidJson(body): ValidJson<UpdateTenantBody>,
) -> RestResult<ApiResponse<Tenant>> {
    Ok(ApiResponse::ok(ctx.services.tenants.update(&tenant, body, actor.id()).await?))
}

pub async fn delete_tenant(State(ctx): State<ApiContext>, Path(tenant): Path<String>) -> RestResult<ApiResponse<()>> {
    ctx.services.tenants.delete(&tenant).await?;
    info!("Tenant {} deleted", tenant);
    Ok(ApiResponse::ok(()))
}

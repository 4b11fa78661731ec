//! Quota endpoints under `/tenants/{tenant}/quotas`

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use ncobase_api_types::{
    CreateQuotaBody, QuotaCheckBody, QuotaCheckResult, QuotaUsageBody, ReadTenantQuota, UpdateQuotaBody,
};

use crate::{
    auth::Actor,
    context::ApiContext,
    errors::RestResult,
    extractors::ValidJson,
    models::ApiResponse,
};

pub async fn list_quotas(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
) -> RestResult<ApiResponse<Vec<ReadTenantQuota>>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(ctx.services.quotas.list(&tenant_id).await?))
}

pub async fn create_quota(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
    actor: Actor,
    ValidJson(body): ValidJson<CreateQuotaBody>,
) -> RestResult<ApiResponse<ReadTenantQuota>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    let quota = ctx.services.quotas.create(&tenant_id, body, actor.id()).await?;
    Ok(ApiResponse::created(quota))
}

/// All quotas keyed by type
pub async fn get_usage(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
) -> RestResult<ApiResponse<BTreeMap<String, ReadTenantQuota>>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(ctx.services.quotas.get_usage(&tenant_id).await?))
}

pub async fn update_usage(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
    actor: Actor,
    ValidJson(body): ValidJson<QuotaUsageBody>,
) -> RestResult<ApiResponse<ReadTenantQuota>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(ctx.services.quotas.update_usage(&tenant_id, body, actor.id()).await?))
}

pub async fn check_quota(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
    ValidJson(body): ValidJson<QuotaCheckBody>,
) -> RestResult<ApiResponse<QuotaCheckResult>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(ctx.services.quotas.check_quota_limit(&tenant_id, body).await?))
}

pub async fn get_quota(
    State(ctx): State<ApiContext>,
    Path((tenant, quota_id)): Path<(String, String)>,
) -> RestResult<ApiResponse<ReadTenantQuota>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(ctx.services.quotas.get(&tenant_id, &quota_id).await?))
}

pub async fn update_quota(
    State(ctx): State<ApiContext>,
    Path((tenant, quota_id)): Path<(String, String)>,
    actor: Actor,
    ValidJson(body): ValidJson<UpdateQuotaBody>,
) -> RestResult<ApiResponse<ReadTenantQuota>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(
        ctx.services.quotas.update(&tenant_id, &quota_id, body, actor.id()).await?,
    ))
}

pub async fn delete_quota(
    State(ctx): State<ApiContext>,
    Path((tenant, quota_id)): Path<(String, String)>,
) -> RestResult<ApiResponse<()>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    ctx.services.quotas.delete(&tenant_id, &quota_id).await?;
    Ok(ApiResponse::ok(()))
}

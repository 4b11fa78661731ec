//! Tenant membership and per-tenant roles

use axum::extract::{Path, State};
use ncobase_api_types::{AddUserTenantBody, AssignRoleBody, Tenant, UserTenant, UserTenantRole};

use crate::{
    auth::Actor,
    context::ApiContext,
    errors::RestResult,
    extractors::{ApiQuery, ValidJson},
    models::{ApiResponse, CursorQuery},
};

pub async fn list_members(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
    ApiQuery(query): ApiQuery<CursorQuery>,
) -> RestResult<ApiResponse<Vec<UserTenant>>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::page(
        ctx.services.user_tenants.tenant_users(&tenant_id, query.into()).await?,
    ))
}

pub async fn add_member(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
    actor: Actor,
    ValidJson(body): ValidJson<AddUserTenantBody>,
) -> RestResult<ApiResponse<UserTenant>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    let membership = ctx
        .services
        .user_tenants
        .add_user(&tenant_id, &body.user_id, actor.id())
        .await?;
    Ok(ApiResponse::created(membership))
}

/// Also revokes the user's roles in the tenant
pub async fn remove_member(
    State(ctx): State<ApiContext>,
    Path((tenant, user_id)): Path<(String, String)>,
) -> RestResult<ApiResponse<()>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    ctx.services.user_tenants.remove_user(&tenant_id, &user_id).await?;
    Ok(ApiResponse::ok(()))
}

pub async fn list_roles(
    State(ctx): State<ApiContext>,
    Path((tenant, user_id)): Path<(String, String)>,
) -> RestResult<ApiResponse<Vec<String>>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(
        ctx.services.user_tenant_roles.roles(&tenant_id, &user_id).await?,
    ))
}

pub async fn assign_role(
    State(ctx): State<ApiContext>,
    Path((tenant, user_id)): Path<(String, String)>,
    actor: Actor,
    ValidJson(body): ValidJson<AssignRoleBody>,
) -> RestResult<ApiResponse<UserTenantRole>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    let assignment = ctx
        .services
        .user_tenant_roles
        .assign(&tenant_id, &user_id, &body.role_id, actor.id())
        .await?;
    Ok(ApiResponse::created(assignment))
}

pub async fn revoke_role(
    State(ctx): State<ApiContext>,
    Path((tenant, user_id, role_id)): Path<(String, String, String)>,
) -> RestResult<ApiResponse<()>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    ctx.services
        .user_tenant_roles
        .revoke(&tenant_id, &user_id, &role_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

pub async fn user_tenants(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
) -> RestResult<ApiResponse<Vec<Tenant>>> {
    Ok(ApiResponse::ok(ctx.services.user_tenants.user_tenants(&user_id).await?))
}

/// The user's default tenant: their earliest membership
pub async fn user_tenant(State(ctx): State<ApiContext>, Path(user_id): Path<String>) -> RestResult<ApiResponse<Tenant>> {
    Ok(ApiResponse::ok(ctx.services.user_tenants.get_user_tenant(&user_id).await?))
}

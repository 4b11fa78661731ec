//! Links from a tenant to groups, menus, dictionaries and options
//!
//! One set of handlers serves all four kinds; the kind is the plural path
//! segment after the tenant.

use axum::extract::{Path, State};
use ncobase_api_types::{AddRelationBody, ReadTenantRelation, RelationKind};

use crate::{
    auth::Actor,
    context::ApiContext,
    errors::{RestError, RestResult},
    extractors::{ApiQuery, ValidJson},
    models::{ApiResponse, CursorQuery},
};

fn kind(segment: &str) -> RestResult<RelationKind> {
    RelationKind::from_plural(segment).ok_or_else(|| RestError::not_found("Route", segment))
}

pub async fn list_relations(
    State(ctx): State<ApiContext>,
    Path((tenant, segment)): Path<(String, String)>,
    ApiQuery(query): ApiQuery<CursorQuery>,
) -> RestResult<ApiResponse<Vec<ReadTenantRelation>>> {
    let kind = kind(&segment)?;
    let tenant_id = ctx.tenant_id(&tenant).await?;
    let page = ctx.services.relation(kind).list(&tenant_id, query.into()).await?;
    Ok(ApiResponse::page(page))
}

pub async fn add_relation(
    State(ctx): State<ApiContext>,
    Path((tenant, segment)): Path<(String, String)>,
    actor: Actor,
    ValidJson(body): ValidJson<AddRelationBody>,
) -> RestResult<ApiResponse<ReadTenantRelation>> {
    let kind = kind(&segment)?;
    let tenant_id = ctx.tenant_id(&tenant).await?;
    let relation = ctx
        .services
        .relation(kind)
        .add(&tenant_id, &body.target_id, actor.id())
        .await?;
    Ok(ApiResponse::created(relation))
}

pub async fn get_relation(
    State(ctx): State<ApiContext>,
    Path((tenant, segment, target_id)): Path<(String, String, String)>,
) -> RestResult<ApiResponse<ReadTenantRelation>> {
    let kind = kind(&segment)?;
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(ctx.services.relation(kind).get(&tenant_id, &target_id).await?))
}

pub async fn remove_relation(
    State(ctx): State<ApiContext>,
    Path((tenant, segment, target_id)): Path<(String, String, String)>,
) -> RestResult<ApiResponse<()>> {
    let kind = kind(&segment)?;
    let tenant_id = ctx.tenant_id(&tenant).await?;
    ctx.services.relation(kind).remove(&tenant_id, &target_id).await?;
    Ok(ApiResponse::ok(()))
}

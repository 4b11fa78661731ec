//! Setting endpoints under `/tenants/{tenant}/settings`

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use ncobase_api_types::{BulkSettingsBody, CreateSettingBody, ReadTenantSetting, SetSettingBody, UpdateSettingBody};
use ncobase_interfaces::SettingFilters;
use serde_json::Value;

use crate::{
    auth::Actor,
    context::ApiContext,
    errors::RestResult,
    extractors::{ApiQuery, ValidJson},
    models::{ApiResponse, SettingListQuery},
};

pub async fn list_settings(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
    ApiQuery(query): ApiQuery<SettingListQuery>,
) -> RestResult<ApiResponse<Vec<ReadTenantSetting>>> {
    let filters = SettingFilters {
        tenant_id: ctx.tenant_id(&tenant).await?,
        scope: query.scope,
        category: query.category,
        public_only: query.public_only,
    };
    Ok(ApiResponse::ok(ctx.services.settings.list(filters).await?))
}

pub async fn create_setting(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
    actor: Actor,
    ValidJson(body): ValidJson<CreateSettingBody>,
) -> RestResult<ApiResponse<ReadTenantSetting>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    let setting = ctx.services.settings.create(&tenant_id, body, actor.id()).await?;
    Ok(ApiResponse::created(setting))
}

/// Public settings as `key -> typed value`
pub async fn public_settings(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
) -> RestResult<ApiResponse<BTreeMap<String, Value>>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(ctx.services.settings.get_public_settings(&tenant_id).await?))
}

/// Upsert several values at once; nothing is written if any key is read-only
pub async fn bulk_set(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
    actor: Actor,
    ValidJson(body): ValidJson<BulkSettingsBody>,
) -> RestResult<ApiResponse<Vec<ReadTenantSetting>>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(
        ctx.services.settings.bulk_set(&tenant_id, body.settings, actor.id()).await?,
    ))
}

pub async fn get_setting(
    State(ctx): State<ApiContext>,
    Path((tenant, key)): Path<(String, String)>,
) -> RestResult<ApiResponse<ReadTenantSetting>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(ctx.services.settings.get(&tenant_id, &key).await?))
}

pub async fn update_setting(
    State(ctx): State<ApiContext>,
    Path((tenant, key)): Path<(String, String)>,
    actor: Actor,
    ValidJson(body): ValidJson<UpdateSettingBody>,
) -> RestResult<ApiResponse<ReadTenantSetting>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(
        ctx.services.settings.update(&tenant_id, &key, body, actor.id()).await?,
    ))
}

pub async fn set_value(
    State(ctx): State<ApiContext>,
    Path((tenant, key)): Path<(String, String)>,
    actor: Actor,
    ValidJson(body): ValidJson<SetSettingBody>,
) -> RestResult<ApiResponse<ReadTenantSetting>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(
        ctx.services
            .settings
            .set_setting(&tenant_id, &key, body.value, actor.id())
            .await?,
    ))
}

pub async fn delete_setting(
    State(ctx): State<ApiContext>,
    Path((tenant, key)): Path<(String, String)>,
) -> RestResult<ApiResponse<()>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    ctx.services.settings.delete(&tenant_id, &key).await?;
    Ok(ApiResponse::ok(()))
}

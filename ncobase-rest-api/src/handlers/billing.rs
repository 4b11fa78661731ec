//! Billing endpoints under `/tenants/{tenant}/billing`

use axum::extract::{Path, State};
use ncobase_api_types::{
    BillingSummary, CreateBillingBody, GenerateInvoiceBody, ProcessPaymentBody, ReadTenantBilling, UpdateBillingBody,
};
use serde_json::{json, Value};
use tracing::info;

use crate::{
    auth::Actor,
    context::ApiContext,
    errors::RestResult,
    extractors::{ApiQuery, ValidJson},
    models::{ApiResponse, BillingListQuery},
};

pub async fn list_billing(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
    ApiQuery(query): ApiQuery<BillingListQuery>,
) -> RestResult<ApiResponse<Vec<ReadTenantBilling>>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    let page = ctx
        .services
        .billing
        .list(&tenant_id, query.status, query.cursor_input())
        .await?;
    Ok(ApiResponse::page(page))
}

pub async fn create_billing(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
    actor: Actor,
    ValidJson(body): ValidJson<CreateBillingBody>,
) -> RestResult<ApiResponse<ReadTenantBilling>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    let billing = ctx.services.billing.create(&tenant_id, body, actor.id()).await?;
    Ok(ApiResponse::created(billing))
}

pub async fn get_summary(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
) -> RestResult<ApiResponse<BillingSummary>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(ctx.services.billing.get_summary(&tenant_id).await?))
}

pub async fn generate_invoice(
    State(ctx): State<ApiContext>,
    Path(tenant): Path<String>,
    actor: Actor,
    ValidJson(body): ValidJson<GenerateInvoiceBody>,
) -> RestResult<ApiResponse<ReadTenantBilling>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    let invoice = ctx.services.billing.generate_invoice(&tenant_id, body, actor.id()).await?;
    Ok(ApiResponse::created(invoice))
}

pub async fn get_billing(
    State(ctx): State<ApiContext>,
    Path((tenant, billing_id)): Path<(String, String)>,
) -> RestResult<ApiResponse<ReadTenantBilling>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(ctx.services.billing.get(&tenant_id, &billing_id).await?))
}

pub async fn update_billing(
    State(ctx): State<ApiContext>,
    Path((tenant, billing_id)): Path<(String, String)>,
    actor: Actor,
    ValidJson(body): ValidJson<UpdateBillingBody>,
) -> RestResult<ApiResponse<ReadTenantBilling>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    Ok(ApiResponse::ok(
        ctx.services
            .billing
            .update(&tenant_id, &billing_id, body, actor.id())
            .await?,
    ))
}

pub async fn delete_billing(
    State(ctx): State<ApiContext>,
    Path((tenant, billing_id)): Path<(String, String)>,
) -> RestResult<ApiResponse<()>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    ctx.services.billing.delete(&tenant_id, &billing_id).await?;
    Ok(ApiResponse::ok(()))
}

pub async fn process_payment(
    State(ctx): State<ApiContext>,
    Path((tenant, billing_id)): Path<(String, String)>,
    actor: Actor,
    ValidJson(body): ValidJson<ProcessPaymentBody>,
) -> RestResult<ApiResponse<ReadTenantBilling>> {
    let tenant_id = ctx.tenant_id(&tenant).await?;
    let billing = ctx
        .services
        .billing
        .process_payment(&tenant_id, &billing_id, body, actor.id())
        .await?;
    info!("Payment recorded for billing {}", billing_id);
    Ok(ApiResponse::ok(billing))
}

/// Flip every pending, past-due billing to overdue
pub async fn mark_overdue(State(ctx): State<ApiContext>) -> RestResult<ApiResponse<Value>> {
    let updated = ctx.services.billing.mark_overdue().await?;
    Ok(ApiResponse::ok(json!({ "updated": updated })))
}

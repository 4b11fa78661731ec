//! Billing records, payments and invoices

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use ncobase_api_types::{
    new_id, BillingPeriod, BillingStatus, BillingSummary, CreateBillingBody, CursorInput, CursorPage,
    GenerateInvoiceBody, ProcessPaymentBody, ReadTenantBilling, TenantBilling, UpdateBillingBody,
};
use ncobase_config::BillingConfig;
use ncobase_interfaces::{BillingFilters, RepositoryFactory};

use crate::calc::{effective_status, invoice_number, invoice_period, read_billing};
use crate::error::{TenantError, TenantResult};

pub struct BillingService {
    repositories: Arc<dyn RepositoryFactory>,
    config: BillingConfig,
}

impl BillingService {
    pub fn new(repositories: Arc<dyn RepositoryFactory>, config: BillingConfig) -> Self {
        Self { repositories, config }
    }

    pub async fn create(
        &self,
        tenant_id: &str,
        body: CreateBillingBody,
        actor: Option<&str>,
    ) -> TenantResult<ReadTenantBilling> {
        body.validate()?;
        let now = Utc::now();
        let repo = self.repositories.billing_repository();

        let invoice_number = match body.invoice_number {
            Some(number) => {
                if repo.find_by_invoice_number(&number).await?.is_some() {
                    return Err(TenantError::Conflict(format!("Invoice number '{}' already exists", number)));
                }
                number
            }
            None => invoice_number(now),
        };

        let billing = TenantBilling {
            id: new_id(),
            tenant_id: tenant_id.to_string(),
            billing_period: body.billing_period,
            period_start: body.period_start,
            period_end: body.period_end,
            amount: body.amount,
            currency: body
                .currency
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or_else(|| self.config.default_currency.clone()),
            status: BillingStatus::Pending,
            invoice_number,
            description: body.description,
            due_date: body.due_date,
            paid_at: None,
            payment_method: None,
            usage_details: body.usage_details.unwrap_or_else(|| json!({})),
            extras: body.extras.unwrap_or_else(|| json!({})),
            created_by: actor.map(str::to_string),
            updated_by: actor.map(str::to_string),
            created_at: now,
            updated_at: now,
        };

        let created = repo.create(billing).await?;
        info!(
            "Created billing {} for tenant {}: {} {}",
            created.invoice_number, tenant_id, created.amount, created.currency
        );
        Ok(read_billing(created, now))
    }

    async fn load(&self, tenant_id: &str, billing_id: &str) -> TenantResult<TenantBilling> {
        self.repositories
            .billing_repository()
            .find_by_id(billing_id)
            .await?
            .filter(|b| b.tenant_id == tenant_id)
            .ok_or_else(|| TenantError::not_found("Billing", billing_id))
    }

    pub async fn get(&self, tenant_id: &str, billing_id: &str) -> TenantResult<ReadTenantBilling> {
        Ok(read_billing(self.load(tenant_id, billing_id).await?, Utc::now()))
    }

    /// Direct field update; this is also how a record becomes cancelled or
    /// refunded. Payments go through `process_payment`.
    pub async fn update(
        &self,
        tenant_id: &str,
        billing_id: &str,
        body: UpdateBillingBody,
        actor: Option<&str>,
    ) -> TenantResult<ReadTenantBilling> {
        body.validate()?;
        let mut billing = self.load(tenant_id, billing_id).await?;
        let loaded_status = billing.status;
        let now = Utc::now();

        if let Some(amount) = body.amount {
            billing.amount = amount;
        }
        if let Some(currency) = body.currency {
            billing.currency = currency.to_ascii_uppercase();
        }
        if let Some(status) = body.status {
            if !loaded_status.can_update_to(status) {
                return Err(TenantError::InvalidTransition {
                    id: billing.id,
                    status: loaded_status,
                    target: status,
                });
            }
            billing.status = status;
        }
        if body.description.is_some() {
            billing.description = body.description;
        }
        if body.due_date.is_some() {
            billing.due_date = body.due_date;
        }
        if let Some(usage_details) = body.usage_details {
            billing.usage_details = usage_details;
        }
        if let Some(extras) = body.extras {
            billing.extras = extras;
        }
        billing.updated_by = actor.map(str::to_string);

        let target = billing.status;
        let updated = self.write_guarded(billing, &[loaded_status], target).await?;
        Ok(read_billing(updated, now))
    }

    /// Persist `billing` only if its stored status is still one of
    /// `expected`; otherwise report the status another writer left behind
    async fn write_guarded(
        &self,
        billing: TenantBilling,
        expected: &[BillingStatus],
        target: BillingStatus,
    ) -> TenantResult<TenantBilling> {
        let repo = self.repositories.billing_repository();
        let id = billing.id.clone();
        match repo.update_if_status(billing, expected).await? {
            Some(updated) => Ok(updated),
            None => {
                let current = repo
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(|| TenantError::not_found("Billing", &id))?;
                Err(TenantError::InvalidTransition {
                    id,
                    status: current.status,
                    target,
                })
            }
        }
    }

    pub async fn delete(&self, tenant_id: &str, billing_id: &str) -> TenantResult<()> {
        let billing = self.load(tenant_id, billing_id).await?;
        self.repositories.billing_repository().delete(&billing.id).await?;
        Ok(())
    }

    pub async fn list(
        &self,
        tenant_id: &str,
        status: Option<BillingStatus>,
        input: CursorInput,
    ) -> TenantResult<CursorPage<ReadTenantBilling>> {
        let filters = BillingFilters {
            tenant_id: Some(tenant_id.to_string()),
            status,
        };
        let page = self.repositories.billing_repository().list(filters, input).await?;
        let now = Utc::now();
        Ok(page.map(|b| read_billing(b, now)))
    }

    /// Record a payment against a pending or overdue record
    pub async fn process_payment(
        &self,
        tenant_id: &str,
        billing_id: &str,
        body: ProcessPaymentBody,
        actor: Option<&str>,
    ) -> TenantResult<ReadTenantBilling> {
        body.validate()?;
        let mut billing = self.load(tenant_id, billing_id).await?;
        if !billing.status.accepts_payment() {
            return Err(TenantError::InvalidTransition {
                id: billing.id,
                status: billing.status,
                target: BillingStatus::Paid,
            });
        }

        let now = Utc::now();
        billing.status = BillingStatus::Paid;
        billing.paid_at = Some(now);
        billing.payment_method = Some(body.payment_method);
        if let Some(transaction_id) = body.transaction_id {
            if !billing.extras.is_object() {
                billing.extras = json!({});
            }
            if let Value::Object(extras) = &mut billing.extras {
                extras.insert("transaction_id".to_string(), Value::String(transaction_id));
            }
        }
        billing.updated_by = actor.map(str::to_string);

        let updated = self
            .write_guarded(
                billing,
                &[BillingStatus::Pending, BillingStatus::Overdue],
                BillingStatus::Paid,
            )
            .await?;
        info!("Recorded payment for billing {} ({})", updated.id, updated.invoice_number);
        Ok(read_billing(updated, now))
    }

    /// Store the overdue status for every pending record past its due date
    pub async fn mark_overdue(&self) -> TenantResult<u64> {
        let changed = self.repositories.billing_repository().mark_overdue(Utc::now()).await?;
        if changed > 0 {
            info!("Marked {} billing records overdue", changed);
        }
        Ok(changed)
    }

    /// Open a zero-amount invoice for the period ending now, due after the
    /// configured number of days
    pub async fn generate_invoice(
        &self,
        tenant_id: &str,
        body: GenerateInvoiceBody,
        actor: Option<&str>,
    ) -> TenantResult<ReadTenantBilling> {
        let now = Utc::now();
        let (period_start, period_end) = invoice_period(body.billing_period, now);
        let description = match body.billing_period {
            BillingPeriod::OneTime => "One-time invoice".to_string(),
            period => format!(
                "{} invoice {} to {}",
                period,
                period_start.format("%Y-%m-%d"),
                period_end.format("%Y-%m-%d")
            ),
        };

        let create = CreateBillingBody {
            billing_period: body.billing_period,
            period_start: Some(period_start),
            period_end: Some(period_end),
            amount: 0.0,
            currency: None,
            invoice_number: None,
            description: Some(description),
            due_date: Some(now + Duration::days(i64::from(self.config.invoice_due_days))),
            usage_details: None,
            extras: None,
        };
        self.create(tenant_id, create, actor).await
    }

    /// Totals by effective status; pending rows past their due date count
    /// as overdue
    pub async fn get_summary(&self, tenant_id: &str) -> TenantResult<BillingSummary> {
        let billings = self.repositories.billing_repository().list_all_by_tenant(tenant_id).await?;
        let now = Utc::now();

        let mut summary = BillingSummary {
            tenant_id: tenant_id.to_string(),
            currency: billings
                .first()
                .map(|b| b.currency.clone())
                .unwrap_or_else(|| self.config.default_currency.clone()),
            ..Default::default()
        };

        for billing in &billings {
            summary.invoice_count += 1;
            summary.total_amount += billing.amount;
            match effective_status(billing.status, billing.due_date, now) {
                BillingStatus::Paid => {
                    summary.paid_amount += billing.amount;
                    summary.paid_count += 1;
                }
                BillingStatus::Pending => {
                    summary.pending_amount += billing.amount;
                    summary.pending_count += 1;
                }
                BillingStatus::Overdue => {
                    summary.overdue_amount += billing.amount;
                    summary.overdue_count += 1;
                }
                BillingStatus::Cancelled | BillingStatus::Refunded => {}
            }
        }
        summary.outstanding_amount = summary.pending_amount + summary.overdue_amount;
        Ok(summary)
    }
}

//! Billing repository implementation using SeaORM

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, QuerySelect, Set};

use ncobase_api_types::{BillingStatus, CursorInput, CursorPage, TenantBilling};
use ncobase_caching::CacheAside;
use ncobase_interfaces::{BillingFilters, BillingRepository, DatabaseError, Repository};

use crate::caches::StorageCaches;
use crate::connection::DatabaseConnection;
use crate::entities::{tenant_billings, TenantBillings};
use crate::error::{corrupt_row, map_db_error};
use crate::pagination::fetch_page;

/// SeaORM implementation of the BillingRepository
#[derive(Clone)]
pub struct SeaOrmBillingRepository {
    db: DatabaseConnection,
    cache: CacheAside<TenantBilling>,
    /// invoice number -> billing id
    invoice_ids: CacheAside<String>,
}

impl SeaOrmBillingRepository {
    pub fn new(db: DatabaseConnection, caches: &StorageCaches) -> Self {
        let policy = caches.policies().billing;
        Self {
            db,
            cache: caches.aside("tenant_billing", policy),
            invoice_ids: caches.aside("tenant_billing_invoice", policy),
        }
    }

    fn to_billing(model: tenant_billings::Model) -> Result<TenantBilling, DatabaseError> {
        let billing_period = model
            .billing_period
            .parse()
            .map_err(|e| corrupt_row("tenant_billing", &model.id, e))?;
        let status = model
            .status
            .parse()
            .map_err(|e| corrupt_row("tenant_billing", &model.id, e))?;

        Ok(TenantBilling {
            id: model.id,
            tenant_id: model.tenant_id,
            billing_period,
            period_start: model.period_start,
            period_end: model.period_end,
            amount: model.amount,
            currency: model.currency,
            status,
            invoice_number: model.invoice_number,
            description: model.description,
            due_date: model.due_date,
            paid_at: model.paid_at,
            payment_method: model.payment_method,
            usage_details: model.usage_details,
            extras: model.extras,
            created_by: model.created_by,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn to_active_model(billing: TenantBilling) -> tenant_billings::ActiveModel {
        tenant_billings::ActiveModel {
            id: Set(billing.id),
            tenant_id: Set(billing.tenant_id),
            billing_period: Set(billing.billing_period.as_str().to_string()),
            period_start: Set(billing.period_start),
            period_end: Set(billing.period_end),
            amount: Set(billing.amount),
            currency: Set(billing.currency),
            status: Set(billing.status.as_str().to_string()),
            invoice_number: Set(billing.invoice_number),
            description: Set(billing.description),
            due_date: Set(billing.due_date),
            paid_at: Set(billing.paid_at),
            payment_method: Set(billing.payment_method),
            usage_details: Set(billing.usage_details),
            extras: Set(billing.extras),
            created_by: Set(billing.created_by),
            updated_by: Set(billing.updated_by),
            created_at: Set(billing.created_at),
            updated_at: Set(billing.updated_at),
        }
    }

    async fn load(&self, id: &str) -> Result<Option<TenantBilling>, DatabaseError> {
        TenantBillings::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find billing by id", e))?
            .map(Self::to_billing)
            .transpose()
    }

    fn apply_filters(
        query: sea_orm::Select<tenant_billings::Entity>,
        filters: &BillingFilters,
    ) -> sea_orm::Select<tenant_billings::Entity> {
        let mut query = query;

        if let Some(tenant_id) = &filters.tenant_id {
            query = query.filter(tenant_billings::Column::TenantId.eq(tenant_id.as_str()));
        }

        if let Some(status) = filters.status {
            query = query.filter(tenant_billings::Column::Status.eq(status.as_str()));
        }

        query
    }

    async fn remember(&self, billing: &TenantBilling) {
        self.cache.set(&billing.id, billing).await;
        self.invoice_ids.set(&billing.invoice_number, &billing.id).await;
    }

    async fn forget(&self, id: &str, invoice_numbers: &[&str]) {
        let mut keys = vec![self.cache.key(id)];
        keys.extend(invoice_numbers.iter().map(|number| self.invoice_ids.key(number)));
        self.cache.remove_keys(keys).await;
    }
}

#[async_trait]
impl Repository for SeaOrmBillingRepository {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.ping().await.map_err(DatabaseError::from)
    }
}

#[async_trait]
impl BillingRepository for SeaOrmBillingRepository {
    async fn create(&self, billing: TenantBilling) -> Result<TenantBilling, DatabaseError> {
        let created = Self::to_active_model(billing)
            .insert(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("create billing", e))?;

        let billing = Self::to_billing(created)?;
        self.remember(&billing).await;
        Ok(billing)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TenantBilling>, DatabaseError> {
        self.cache.get_or_load(id, || self.load(id)).await
    }

    async fn find_by_invoice_number(&self, invoice_number: &str) -> Result<Option<TenantBilling>, DatabaseError> {
        if let Some(id) = self.invoice_ids.get(invoice_number).await {
            if let Some(billing) = self.find_by_id(&id).await? {
                if billing.invoice_number == invoice_number {
                    return Ok(Some(billing));
                }
            }
            self.invoice_ids.invalidate(&[invoice_number]).await;
        }

        let billing = TenantBillings::find()
            .filter(tenant_billings::Column::InvoiceNumber.eq(invoice_number))
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find billing by invoice number", e))?
            .map(Self::to_billing)
            .transpose()?;

        if let Some(billing) = &billing {
            self.remember(billing).await;
        }
        Ok(billing)
    }

    async fn update_if_status(
        &self,
        billing: TenantBilling,
        expected: &[BillingStatus],
    ) -> Result<Option<TenantBilling>, DatabaseError> {
        let existing = TenantBillings::find_by_id(billing.id.as_str())
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find billing for update", e))?
            .ok_or_else(|| DatabaseError::not_found("TenantBilling", billing.id.as_str()))?;

        let id = billing.id.clone();
        let mut active_model = Self::to_active_model(billing);
        active_model.id = NotSet;
        active_model.created_at = NotSet;
        active_model.created_by = NotSet;
        active_model.updated_at = Set(Utc::now());

        // the status guard runs in the same statement as the write
        let result = TenantBillings::update_many()
            .set(active_model)
            .filter(tenant_billings::Column::Id.eq(id.as_str()))
            .filter(tenant_billings::Column::Status.is_in(expected.iter().map(|status| status.as_str())))
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("update billing", e))?;

        if result.rows_affected == 0 {
            // a cached copy may still show the status the caller expected
            self.forget(&id, &[existing.invoice_number.as_str()]).await;
            return Ok(None);
        }

        let updated = self
            .load(&id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("TenantBilling", id.as_str()))?;
        self.forget(
            &updated.id,
            &[existing.invoice_number.as_str(), updated.invoice_number.as_str()],
        )
        .await;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        let existing = TenantBillings::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find billing for delete", e))?
            .ok_or_else(|| DatabaseError::not_found("TenantBilling", id))?;

        TenantBillings::delete_by_id(id)
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("delete billing", e))?;

        self.forget(id, &[existing.invoice_number.as_str()]).await;
        Ok(())
    }

    async fn list(
        &self,
        filters: BillingFilters,
        input: CursorInput,
    ) -> Result<CursorPage<TenantBilling>, DatabaseError> {
        fetch_page(
            self.db.get_connection(),
            Self::apply_filters(TenantBillings::find(), &filters),
            tenant_billings::Column::Id,
            &input,
            "list billings",
            Self::to_billing,
        )
        .await
    }

    async fn list_all_by_tenant(&self, tenant_id: &str) -> Result<Vec<TenantBilling>, DatabaseError> {
        TenantBillings::find()
            .filter(tenant_billings::Column::TenantId.eq(tenant_id))
            .order_by_asc(tenant_billings::Column::Id)
            .all(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("list billings by tenant", e))?
            .into_iter()
            .map(Self::to_billing)
            .collect()
    }

    async fn mark_overdue(&self, now: DateTime<Utc>) -> Result<u64, DatabaseError> {
        let due: Vec<(String, String)> = TenantBillings::find()
            .select_only()
            .column(tenant_billings::Column::Id)
            .column(tenant_billings::Column::InvoiceNumber)
            .filter(tenant_billings::Column::Status.eq(BillingStatus::Pending.as_str()))
            .filter(tenant_billings::Column::DueDate.lt(now))
            .into_tuple()
            .all(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find overdue billings", e))?;

        if due.is_empty() {
            return Ok(0);
        }

        // the status guard keeps rows paid in the meantime untouched
        let result = TenantBillings::update_many()
            .col_expr(
                tenant_billings::Column::Status,
                Expr::value(BillingStatus::Overdue.as_str()),
            )
            .col_expr(tenant_billings::Column::UpdatedAt, Expr::value(now))
            .filter(tenant_billings::Column::Id.is_in(due.iter().map(|(id, _)| id.clone())))
            .filter(tenant_billings::Column::Status.eq(BillingStatus::Pending.as_str()))
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("mark billings overdue", e))?;

        for (id, invoice_number) in &due {
            self.forget(id, &[invoice_number.as_str()]).await;
        }
        Ok(result.rows_affected)
    }

    async fn delete_all_by_tenant(&self, tenant_id: &str) -> Result<u64, DatabaseError> {
        let billings = self.list_all_by_tenant(tenant_id).await?;
        let result = TenantBillings::delete_many()
            .filter(tenant_billings::Column::TenantId.eq(tenant_id))
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("delete billings by tenant", e))?;

        for billing in &billings {
            self.forget(&billing.id, &[billing.invoice_number.as_str()]).await;
        }
        Ok(result.rows_affected)
    }
}

//! Quota repository implementation using SeaORM

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use ncobase_api_types::{new_id, QuotaType, TenantQuota};
use ncobase_caching::CacheAside;
use ncobase_interfaces::{DatabaseError, QuotaRepository, Repository};

use crate::caches::StorageCaches;
use crate::connection::DatabaseConnection;
use crate::entities::{tenant_quotas, TenantQuotas};
use crate::error::{corrupt_row, is_unique_violation, map_db_error};

/// SeaORM implementation of the QuotaRepository
#[derive(Clone)]
pub struct SeaOrmQuotaRepository {
    db: DatabaseConnection,
    cache: CacheAside<TenantQuota>,
    /// `<tenant>:<type>` -> quota id
    type_ids: CacheAside<String>,
}

impl SeaOrmQuotaRepository {
    pub fn new(db: DatabaseConnection, caches: &StorageCaches) -> Self {
        let policy = caches.policies().quota;
        Self {
            db,
            cache: caches.aside("tenant_quota", policy),
            type_ids: caches.aside("tenant_quota_type", policy),
        }
    }

    fn type_key(tenant_id: &str, quota_type: QuotaType) -> String {
        format!("{}:{}", tenant_id, quota_type.as_str())
    }

    fn to_quota(model: tenant_quotas::Model) -> Result<TenantQuota, DatabaseError> {
        let quota_type = model
            .quota_type
            .parse()
            .map_err(|e| corrupt_row("tenant_quota", &model.id, e))?;
        let unit = model.unit.parse().map_err(|e| corrupt_row("tenant_quota", &model.id, e))?;

        Ok(TenantQuota {
            id: model.id,
            tenant_id: model.tenant_id,
            quota_type,
            quota_name: model.quota_name,
            max_value: model.max_value,
            current_used: model.current_used,
            unit,
            description: model.description,
            enabled: model.enabled,
            extras: model.extras,
            created_by: model.created_by,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn to_active_model(quota: TenantQuota) -> tenant_quotas::ActiveModel {
        tenant_quotas::ActiveModel {
            id: Set(quota.id),
            tenant_id: Set(quota.tenant_id),
            quota_type: Set(quota.quota_type.as_str().to_string()),
            quota_name: Set(quota.quota_name),
            max_value: Set(quota.max_value),
            current_used: Set(quota.current_used),
            unit: Set(quota.unit.as_str().to_string()),
            description: Set(quota.description),
            enabled: Set(quota.enabled),
            extras: Set(quota.extras),
            created_by: Set(quota.created_by),
            updated_by: Set(quota.updated_by),
            created_at: Set(quota.created_at),
            updated_at: Set(quota.updated_at),
        }
    }

    async fn find_one(&self, condition: SimpleExpr, action: &str) -> Result<Option<TenantQuota>, DatabaseError> {
        TenantQuotas::find()
            .filter(condition)
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error(action, e))?
            .map(Self::to_quota)
            .transpose()
    }

    async fn load_by_type(&self, tenant_id: &str, quota_type: QuotaType) -> Result<Option<TenantQuota>, DatabaseError> {
        self.find_one(
            tenant_quotas::Column::TenantId
                .eq(tenant_id)
                .and(tenant_quotas::Column::QuotaType.eq(quota_type.as_str())),
            "find quota by type",
        )
        .await
    }

    async fn remember(&self, quota: &TenantQuota) {
        self.cache.set(&quota.id, quota).await;
        self.type_ids
            .set(&Self::type_key(&quota.tenant_id, quota.quota_type), &quota.id)
            .await;
    }

    async fn forget(&self, id: &str, type_keys: &[String]) {
        let mut keys = vec![self.cache.key(id)];
        keys.extend(type_keys.iter().map(|key| self.type_ids.key(key)));
        self.cache.remove_keys(keys).await;
    }

    /// `current_used + delta` floored at zero and capped at `i64::MAX`, as one
    /// conditional UPDATE so concurrent deltas never lose each other's writes
    async fn add_usage(
        &self,
        tenant_id: &str,
        quota_type: QuotaType,
        delta: i64,
        actor: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<u64, DatabaseError> {
        // current_used + delta < 0  <=>  current_used < -delta
        let floor = delta.checked_neg().ok_or_else(|| DatabaseError::Validation {
            message: format!("usage delta {} is out of range", delta),
        })?;

        let used = tenant_quotas::Column::CurrentUsed;
        let mut next = Expr::case(Expr::col(used).lt(floor), 0i64);
        if delta > 0 {
            // SQLite turns an overflowing integer sum into REAL
            next = next.case(Expr::col(used).gt(i64::MAX - delta), i64::MAX);
        }
        let result = TenantQuotas::update_many()
            .col_expr(used, next.finally(Expr::col(used).add(delta)).into())
            .col_expr(tenant_quotas::Column::UpdatedAt, Expr::value(now))
            .col_expr(tenant_quotas::Column::UpdatedBy, Expr::value(actor.map(str::to_string)))
            .filter(tenant_quotas::Column::TenantId.eq(tenant_id))
            .filter(tenant_quotas::Column::QuotaType.eq(quota_type.as_str()))
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("apply quota usage", e))?;
        Ok(result.rows_affected)
    }

    fn implicit_quota(
        tenant_id: &str,
        quota_type: QuotaType,
        delta: i64,
        actor: Option<&str>,
        now: DateTime<Utc>,
    ) -> tenant_quotas::ActiveModel {
        let (max_value, unit) = quota_type.default_limit();
        Self::to_active_model(TenantQuota {
            id: new_id(),
            tenant_id: tenant_id.to_string(),
            quota_type,
            quota_name: quota_type.as_str().to_string(),
            max_value,
            current_used: delta.max(0),
            unit,
            description: None,
            enabled: true,
            extras: serde_json::json!({}),
            created_by: actor.map(str::to_string),
            updated_by: actor.map(str::to_string),
            created_at: now,
            updated_at: now,
        })
    }
}

#[async_trait]
impl Repository for SeaOrmQuotaRepository {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.ping().await.map_err(DatabaseError::from)
    }
}

#[async_trait]
impl QuotaRepository for SeaOrmQuotaRepository {
    async fn create(&self, quota: TenantQuota) -> Result<TenantQuota, DatabaseError> {
        let created = Self::to_active_model(quota)
            .insert(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("create quota", e))?;

        let quota = Self::to_quota(created)?;
        self.remember(&quota).await;
        Ok(quota)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TenantQuota>, DatabaseError> {
        self.cache
            .get_or_load(id, || {
                self.find_one(tenant_quotas::Column::Id.eq(id), "find quota by id")
            })
            .await
    }

    async fn find_by_type(&self, tenant_id: &str, quota_type: QuotaType) -> Result<Option<TenantQuota>, DatabaseError> {
        let type_key = Self::type_key(tenant_id, quota_type);
        if let Some(id) = self.type_ids.get(&type_key).await {
            if let Some(quota) = self.find_by_id(&id).await? {
                if quota.tenant_id == tenant_id && quota.quota_type == quota_type {
                    return Ok(Some(quota));
                }
            }
            self.type_ids.invalidate(&[type_key.as_str()]).await;
        }

        let quota = self.load_by_type(tenant_id, quota_type).await?;
        if let Some(quota) = &quota {
            self.remember(quota).await;
        }
        Ok(quota)
    }

    async fn update(&self, quota: TenantQuota) -> Result<TenantQuota, DatabaseError> {
        let existing = TenantQuotas::find_by_id(quota.id.as_str())
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find quota for update", e))?
            .ok_or_else(|| DatabaseError::not_found("TenantQuota", quota.id.as_str()))?;
        let existing = Self::to_quota(existing)?;

        let mut active_model = Self::to_active_model(quota);
        active_model.created_at = Set(existing.created_at);
        active_model.created_by = Set(existing.created_by.clone());
        active_model.updated_at = Set(Utc::now());

        let updated = active_model
            .update(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("update quota", e))?;
        let updated = Self::to_quota(updated)?;

        self.forget(
            &updated.id,
            &[
                Self::type_key(&existing.tenant_id, existing.quota_type),
                Self::type_key(&updated.tenant_id, updated.quota_type),
            ],
        )
        .await;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        let existing = self
            .find_one(tenant_quotas::Column::Id.eq(id), "find quota for delete")
            .await?
            .ok_or_else(|| DatabaseError::not_found("TenantQuota", id))?;

        TenantQuotas::delete_by_id(id)
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("delete quota", e))?;

        self.forget(id, &[Self::type_key(&existing.tenant_id, existing.quota_type)])
            .await;
        Ok(())
    }

    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<TenantQuota>, DatabaseError> {
        TenantQuotas::find()
            .filter(tenant_quotas::Column::TenantId.eq(tenant_id))
            .order_by_asc(tenant_quotas::Column::Id)
            .all(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("list quotas", e))?
            .into_iter()
            .map(Self::to_quota)
            .collect()
    }

    async fn apply_usage_delta(
        &self,
        tenant_id: &str,
        quota_type: QuotaType,
        delta: i64,
        actor: Option<&str>,
    ) -> Result<TenantQuota, DatabaseError> {
        let now = Utc::now();

        if self.add_usage(tenant_id, quota_type, delta, actor, now).await? == 0 {
            let insert = TenantQuotas::insert(Self::implicit_quota(tenant_id, quota_type, delta, actor, now))
                .exec_without_returning(self.db.get_connection())
                .await;
            match insert {
                Ok(_) => {}
                // another writer created the row first; apply on top of it
                Err(e) if is_unique_violation(&e) => {
                    self.add_usage(tenant_id, quota_type, delta, actor, now).await?;
                }
                Err(e) => return Err(map_db_error("create quota", e)),
            }
        }

        let quota = self
            .load_by_type(tenant_id, quota_type)
            .await?
            .ok_or_else(|| DatabaseError::not_found("TenantQuota", Self::type_key(tenant_id, quota_type)))?;

        self.forget(&quota.id, &[Self::type_key(tenant_id, quota_type)]).await;
        Ok(quota)
    }

    async fn delete_all_by_tenant(&self, tenant_id: &str) -> Result<u64, DatabaseError> {
        let quotas = self.list_by_tenant(tenant_id).await?;
        let result = TenantQuotas::delete_many()
            .filter(tenant_quotas::Column::TenantId.eq(tenant_id))
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("delete quotas by tenant", e))?;

        for quota in &quotas {
            self.forget(&quota.id, &[Self::type_key(tenant_id, quota.quota_type)])
                .await;
        }
        Ok(result.rows_affected)
    }
}

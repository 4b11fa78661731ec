//! Quota limits and usage tracking

use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use ncobase_api_types::{
    new_id, CreateQuotaBody, QuotaCheckBody, QuotaCheckResult, QuotaType, QuotaUsageBody, ReadTenantQuota, TenantQuota,
    UpdateQuotaBody,
};
use ncobase_interfaces::RepositoryFactory;

use crate::calc::{read_quota, within_limit};
use crate::error::{TenantError, TenantResult};

pub struct QuotaService {
    repositories: Arc<dyn RepositoryFactory>,
}

impl QuotaService {
    pub fn new(repositories: Arc<dyn RepositoryFactory>) -> Self {
        Self { repositories }
    }

    pub async fn create(
        &self,
        tenant_id: &str,
        body: CreateQuotaBody,
        actor: Option<&str>,
    ) -> TenantResult<ReadTenantQuota> {
        body.validate()?;
        let repo = self.repositories.quota_repository();
        if repo.find_by_type(tenant_id, body.quota_type).await?.is_some() {
            return Err(TenantError::Conflict(format!(
                "Tenant {} already has a {} quota",
                tenant_id, body.quota_type
            )));
        }

        let (_, default_unit) = body.quota_type.default_limit();
        let now = Utc::now();
        let quota = TenantQuota {
            id: new_id(),
            tenant_id: tenant_id.to_string(),
            quota_type: body.quota_type,
            quota_name: body
                .quota_name
                .unwrap_or_else(|| body.quota_type.as_str().to_string()),
            max_value: body.max_value,
            current_used: body.current_used.unwrap_or(0),
            unit: body.unit.unwrap_or(default_unit),
            description: body.description,
            enabled: body.enabled.unwrap_or(true),
            extras: body.extras.unwrap_or_else(|| json!({})),
            created_by: actor.map(str::to_string),
            updated_by: actor.map(str::to_string),
            created_at: now,
            updated_at: now,
        };

        let created = repo.create(quota).await?;
        info!(
            "Created {} quota for tenant {} with limit {}",
            created.quota_type, tenant_id, created.max_value
        );
        Ok(read_quota(created))
    }

    async fn load(&self, tenant_id: &str, quota_id: &str) -> TenantResult<TenantQuota> {
        self.repositories
            .quota_repository()
            .find_by_id(quota_id)
            .await?
            .filter(|q| q.tenant_id == tenant_id)
            .ok_or_else(|| TenantError::not_found("Quota", quota_id))
    }

    pub async fn get(&self, tenant_id: &str, quota_id: &str) -> TenantResult<ReadTenantQuota> {
        Ok(read_quota(self.load(tenant_id, quota_id).await?))
    }

    pub async fn get_by_type(&self, tenant_id: &str, quota_type: QuotaType) -> TenantResult<ReadTenantQuota> {
        self.repositories
            .quota_repository()
            .find_by_type(tenant_id, quota_type)
            .await?
            .map(read_quota)
            .ok_or_else(|| TenantError::not_found("Quota", format!("{}:{}", tenant_id, quota_type)))
    }

    /// Absolute update; usage deltas go through [`QuotaService::update_usage`]
    pub async fn update(
        &self,
        tenant_id: &str,
        quota_id: &str,
        body: UpdateQuotaBody,
        actor: Option<&str>,
    ) -> TenantResult<ReadTenantQuota> {
        body.validate()?;
        let mut quota = self.load(tenant_id, quota_id).await?;

        if let Some(name) = body.quota_name {
            quota.quota_name = name;
        }
        if let Some(max_value) = body.max_value {
            quota.max_value = max_value;
        }
        if let Some(current_used) = body.current_used {
            quota.current_used = current_used;
        }
        if let Some(unit) = body.unit {
            quota.unit = unit;
        }
        if body.description.is_some() {
            quota.description = body.description;
        }
        if let Some(enabled) = body.enabled {
            quota.enabled = enabled;
        }
        if let Some(extras) = body.extras {
            quota.extras = extras;
        }
        quota.updated_by = actor.map(str::to_string);

        let updated = self.repositories.quota_repository().update(quota).await?;
        Ok(read_quota(updated))
    }

    pub async fn delete(&self, tenant_id: &str, quota_id: &str) -> TenantResult<()> {
        let quota = self.load(tenant_id, quota_id).await?;
        self.repositories.quota_repository().delete(&quota.id).await?;
        Ok(())
    }

    pub async fn list(&self, tenant_id: &str) -> TenantResult<Vec<ReadTenantQuota>> {
        let quotas = self.repositories.quota_repository().list_by_tenant(tenant_id).await?;
        Ok(quotas.into_iter().map(read_quota).collect())
    }

    /// Whether `amount` more units fit. Tenants without a quota of the given
    /// type, or with the quota disabled, are unrestricted.
    pub async fn check_quota_limit(&self, tenant_id: &str, body: QuotaCheckBody) -> TenantResult<QuotaCheckResult> {
        body.validate()?;
        let quota = self
            .repositories
            .quota_repository()
            .find_by_type(tenant_id, body.quota_type)
            .await?;

        let allowed = match &quota {
            Some(quota) => within_limit(quota, body.amount),
            None => true,
        };
        debug!(
            "Quota check for tenant {} {} +{}: {}",
            tenant_id, body.quota_type, body.amount, allowed
        );

        Ok(QuotaCheckResult {
            tenant_id: tenant_id.to_string(),
            quota_type: body.quota_type,
            amount: body.amount,
            allowed,
        })
    }

    /// Apply a usage delta, clamped at zero; creates the quota on first use
    pub async fn update_usage(
        &self,
        tenant_id: &str,
        body: QuotaUsageBody,
        actor: Option<&str>,
    ) -> TenantResult<ReadTenantQuota> {
        let quota = self
            .repositories
            .quota_repository()
            .apply_usage_delta(tenant_id, body.quota_type, body.delta, actor)
            .await?;
        debug!(
            "Quota {} for tenant {} now at {}/{}",
            quota.quota_type, tenant_id, quota.current_used, quota.max_value
        );
        Ok(read_quota(quota))
    }

    /// Every quota of the tenant keyed by type
    pub async fn get_usage(&self, tenant_id: &str) -> TenantResult<BTreeMap<String, ReadTenantQuota>> {
        let quotas = self.list(tenant_id).await?;
        Ok(quotas
            .into_iter()
            .map(|q| (q.quota.quota_type.as_str().to_string(), q))
            .collect())
    }
}

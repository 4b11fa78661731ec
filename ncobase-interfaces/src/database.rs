//! Database repository interfaces
//!
//! One trait per entity. Implementations are expected to apply cache-aside
//! reads and invalidate on writes; callers never see cache failures.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ncobase_api_types::{
    BillingStatus, CursorInput, CursorPage, QuotaType, RelationKind, SettingScope, Tenant, TenantBilling,
    TenantQuota, TenantRelation, TenantSetting, UserTenant, UserTenantRole,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Common database error type
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Constraint violation: {message}")]
    Constraint { message: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Transaction error: {message}")]
    Transaction { message: String },

    #[error("Internal database error: {message}")]
    Internal { message: String },
}

impl DatabaseError {
    pub fn not_found(entity: &str, id: impl Into<String>) -> Self {
        DatabaseError::NotFound {
            entity: entity.to_string(),
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound { .. })
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self, DatabaseError::Constraint { .. })
    }
}

/// Base repository trait with health check capability
#[async_trait]
pub trait Repository: Send + Sync {
    /// Check if the repository is healthy and can serve requests
    async fn health_check(&self) -> Result<(), DatabaseError>;
}

// =============================================================================
// Tenant Repository
// =============================================================================

#[async_trait]
pub trait TenantRepository: Repository {
    async fn create(&self, tenant: Tenant) -> Result<Tenant, DatabaseError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>, DatabaseError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, DatabaseError>;

    /// The tenant a user belongs to by default (earliest membership)
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Tenant>, DatabaseError>;

    async fn update(&self, tenant: Tenant) -> Result<Tenant, DatabaseError>;

    async fn delete(&self, id: &str) -> Result<(), DatabaseError>;

    async fn list(&self, input: CursorInput) -> Result<CursorPage<Tenant>, DatabaseError>;

    async fn count(&self) -> Result<u64, DatabaseError>;
}

// =============================================================================
// Quota Repository
// =============================================================================

#[async_trait]
pub trait QuotaRepository: Repository {
    async fn create(&self, quota: TenantQuota) -> Result<TenantQuota, DatabaseError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<TenantQuota>, DatabaseError>;

    async fn find_by_type(
        &self,
        tenant_id: &str,
        quota_type: QuotaType,
    ) -> Result<Option<TenantQuota>, DatabaseError>;

    async fn update(&self, quota: TenantQuota) -> Result<TenantQuota, DatabaseError>;

    async fn delete(&self, id: &str) -> Result<(), DatabaseError>;

    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<TenantQuota>, DatabaseError>;

    /// Add `delta` to `current_used`, never going below zero, in a single
    /// conditional statement. Creates the row with the type's default
    /// ceiling when it does not exist yet.
    async fn apply_usage_delta(
        &self,
        tenant_id: &str,
        quota_type: QuotaType,
        delta: i64,
        actor: Option<&str>,
    ) -> Result<TenantQuota, DatabaseError>;

    async fn delete_all_by_tenant(&self, tenant_id: &str) -> Result<u64, DatabaseError>;
}

// =============================================================================
// Billing Repository
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingFilters {
    pub tenant_id: Option<String>,
    pub status: Option<BillingStatus>,
}

#[async_trait]
pub trait BillingRepository: Repository {
    async fn create(&self, billing: TenantBilling) -> Result<TenantBilling, DatabaseError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<TenantBilling>, DatabaseError>;

    async fn find_by_invoice_number(&self, invoice_number: &str) -> Result<Option<TenantBilling>, DatabaseError>;

    /// Write the record only while its stored status is one of `expected`.
    /// `Ok(None)` when the row exists but its status no longer matches.
    async fn update_if_status(
        &self,
        billing: TenantBilling,
        expected: &[BillingStatus],
    ) -> Result<Option<TenantBilling>, DatabaseError>;

    async fn delete(&self, id: &str) -> Result<(), DatabaseError>;

    async fn list(
        &self,
        filters: BillingFilters,
        input: CursorInput,
    ) -> Result<CursorPage<TenantBilling>, DatabaseError>;

    async fn list_all_by_tenant(&self, tenant_id: &str) -> Result<Vec<TenantBilling>, DatabaseError>;

    /// Flip every pending row with `due_date < now` to overdue; returns the
    /// number of rows changed.
    async fn mark_overdue(&self, now: DateTime<Utc>) -> Result<u64, DatabaseError>;

    async fn delete_all_by_tenant(&self, tenant_id: &str) -> Result<u64, DatabaseError>;
}

// =============================================================================
// Setting Repository
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingFilters {
    pub tenant_id: String,
    pub scope: Option<SettingScope>,
    pub category: Option<String>,
    pub public_only: bool,
}

#[async_trait]
pub trait SettingRepository: Repository {
    async fn create(&self, setting: TenantSetting) -> Result<TenantSetting, DatabaseError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<TenantSetting>, DatabaseError>;

    async fn find_by_key(&self, tenant_id: &str, key: &str) -> Result<Option<TenantSetting>, DatabaseError>;

    async fn update(&self, setting: TenantSetting) -> Result<TenantSetting, DatabaseError>;

    async fn delete(&self, id: &str) -> Result<(), DatabaseError>;

    async fn list(&self, filters: SettingFilters) -> Result<Vec<TenantSetting>, DatabaseError>;

    async fn delete_all_by_tenant(&self, tenant_id: &str) -> Result<u64, DatabaseError>;
}

// =============================================================================
// Relation Repositories
// =============================================================================

/// Tenant join rows of one [`RelationKind`]
#[async_trait]
pub trait TenantRelationRepository: Repository {
    fn kind(&self) -> RelationKind;

    /// Insert the pair; an existing pair is returned unchanged
    async fn add(&self, relation: TenantRelation) -> Result<TenantRelation, DatabaseError>;

    async fn find(&self, tenant_id: &str, target_id: &str) -> Result<Option<TenantRelation>, DatabaseError>;

    async fn exists(&self, tenant_id: &str, target_id: &str) -> Result<bool, DatabaseError>;

    /// Returns false when the pair did not exist
    async fn remove(&self, tenant_id: &str, target_id: &str) -> Result<bool, DatabaseError>;

    async fn list_by_tenant(
        &self,
        tenant_id: &str,
        input: CursorInput,
    ) -> Result<CursorPage<TenantRelation>, DatabaseError>;

    async fn target_ids_by_tenant(&self, tenant_id: &str) -> Result<Vec<String>, DatabaseError>;

    async fn tenant_ids_by_target(&self, target_id: &str) -> Result<Vec<String>, DatabaseError>;

    async fn delete_all_by_tenant(&self, tenant_id: &str) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait UserTenantRepository: Repository {
    /// Insert the membership; an existing membership is returned unchanged
    async fn add(&self, membership: UserTenant) -> Result<UserTenant, DatabaseError>;

    async fn remove(&self, user_id: &str, tenant_id: &str) -> Result<bool, DatabaseError>;

    async fn find(&self, user_id: &str, tenant_id: &str) -> Result<Option<UserTenant>, DatabaseError>;

    /// Earliest membership of the user
    async fn find_default(&self, user_id: &str) -> Result<Option<UserTenant>, DatabaseError>;

    async fn is_member(&self, user_id: &str, tenant_id: &str) -> Result<bool, DatabaseError>;

    async fn tenant_ids_by_user(&self, user_id: &str) -> Result<Vec<String>, DatabaseError>;

    async fn user_ids_by_tenant(&self, tenant_id: &str) -> Result<Vec<String>, DatabaseError>;

    async fn list_by_tenant(
        &self,
        tenant_id: &str,
        input: CursorInput,
    ) -> Result<CursorPage<UserTenant>, DatabaseError>;

    async fn delete_all_by_tenant(&self, tenant_id: &str) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait UserTenantRoleRepository: Repository {
    /// Insert the assignment; an existing assignment is returned unchanged
    async fn assign(&self, assignment: UserTenantRole) -> Result<UserTenantRole, DatabaseError>;

    async fn revoke(&self, user_id: &str, tenant_id: &str, role_id: &str) -> Result<bool, DatabaseError>;

    async fn role_ids(&self, user_id: &str, tenant_id: &str) -> Result<Vec<String>, DatabaseError>;

    async fn user_ids_with_role(&self, tenant_id: &str, role_id: &str) -> Result<Vec<String>, DatabaseError>;

    async fn has_role(&self, user_id: &str, tenant_id: &str, role_id: &str) -> Result<bool, DatabaseError>;

    async fn revoke_all(&self, user_id: &str, tenant_id: &str) -> Result<u64, DatabaseError>;

    async fn delete_all_by_tenant(&self, tenant_id: &str) -> Result<u64, DatabaseError>;
}

// =============================================================================
// Repository Factory
// =============================================================================

#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    fn tenant_repository(&self) -> Arc<dyn TenantRepository>;

    fn quota_repository(&self) -> Arc<dyn QuotaRepository>;

    fn billing_repository(&self) -> Arc<dyn BillingRepository>;

    fn setting_repository(&self) -> Arc<dyn SettingRepository>;

    fn relation_repository(&self, kind: RelationKind) -> Arc<dyn TenantRelationRepository>;

    fn user_tenant_repository(&self) -> Arc<dyn UserTenantRepository>;

    fn user_tenant_role_repository(&self) -> Arc<dyn UserTenantRoleRepository>;

    /// Check health of all repositories
    async fn health_check(&self) -> Result<(), DatabaseError>;
}

//! User membership in tenants

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use ncobase_api_types::{new_id, CursorInput, CursorPage, Tenant, UserTenant};
use ncobase_interfaces::RepositoryFactory;

use crate::error::{TenantError, TenantResult};

pub struct UserTenantService {
    repositories: Arc<dyn RepositoryFactory>,
}

impl UserTenantService {
    pub fn new(repositories: Arc<dyn RepositoryFactory>) -> Self {
        Self { repositories }
    }

    /// Idempotent: an existing membership is returned unchanged
    pub async fn add_user(&self, tenant_id: &str, user_id: &str, actor: Option<&str>) -> TenantResult<UserTenant> {
        if user_id.is_empty() {
            return Err(TenantError::validation("user_id", "user_id is required"));
        }
        let now = Utc::now();
        let membership = UserTenant {
            id: new_id(),
            user_id: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            created_by: actor.map(str::to_string),
            updated_by: actor.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        Ok(self.repositories.user_tenant_repository().add(membership).await?)
    }

    /// Remove the membership and every role the user held in the tenant
    pub async fn remove_user(&self, tenant_id: &str, user_id: &str) -> TenantResult<()> {
        let removed = self
            .repositories
            .user_tenant_repository()
            .remove(user_id, tenant_id)
            .await?;
        if !removed {
            return Err(TenantError::not_found("Membership", format!("{}:{}", user_id, tenant_id)));
        }
        let revoked = self
            .repositories
            .user_tenant_role_repository()
            .revoke_all(user_id, tenant_id)
            .await?;
        info!(
            "Removed user {} from tenant {} and revoked {} roles",
            user_id, tenant_id, revoked
        );
        Ok(())
    }

    /// The user's default tenant (earliest membership)
    pub async fn get_user_tenant(&self, user_id: &str) -> TenantResult<Tenant> {
        self.repositories
            .tenant_repository()
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| TenantError::not_found("Tenant", format!("for user {}", user_id)))
    }

    /// Every tenant the user belongs to, in membership order
    pub async fn user_tenants(&self, user_id: &str) -> TenantResult<Vec<Tenant>> {
        let ids = self.repositories.user_tenant_repository().tenant_ids_by_user(user_id).await?;
        let repo = self.repositories.tenant_repository();
        let mut tenants = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(tenant) = repo.find_by_id(&id).await? {
                tenants.push(tenant);
            }
        }
        Ok(tenants)
    }

    pub async fn tenant_users(&self, tenant_id: &str, input: CursorInput) -> TenantResult<CursorPage<UserTenant>> {
        Ok(self
            .repositories
            .user_tenant_repository()
            .list_by_tenant(tenant_id, input)
            .await?)
    }

    pub async fn user_ids(&self, tenant_id: &str) -> TenantResult<Vec<String>> {
        Ok(self.repositories.user_tenant_repository().user_ids_by_tenant(tenant_id).await?)
    }

    pub async fn is_member(&self, tenant_id: &str, user_id: &str) -> TenantResult<bool> {
        Ok(self
            .repositories
            .user_tenant_repository()
            .is_member(user_id, tenant_id)
            .await?)
    }
}

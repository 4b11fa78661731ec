//! Roles a user holds inside a tenant

use chrono::Utc;
use std::sync::Arc;

use ncobase_api_types::{new_id, UserTenantRole};
use ncobase_interfaces::RepositoryFactory;

use crate::error::{TenantError, TenantResult};

pub struct UserTenantRoleService {
    repositories: Arc<dyn RepositoryFactory>,
}

impl UserTenantRoleService {
    pub fn new(repositories: Arc<dyn RepositoryFactory>) -> Self {
        Self { repositories }
    }

    /// Only members of the tenant can hold roles in it
    pub async fn assign(
        &self,
        tenant_id: &str,
        user_id: &str,
        role_id: &str,
        actor: Option<&str>,
    ) -> TenantResult<UserTenantRole> {
        if role_id.is_empty() {
            return Err(TenantError::validation("role_id", "role_id is required"));
        }
        let is_member = self
            .repositories
            .user_tenant_repository()
            .is_member(user_id, tenant_id)
            .await?;
        if !is_member {
            return Err(TenantError::validation(
                "user_id",
                format!("user {} is not a member of tenant {}", user_id, tenant_id),
            ));
        }

        let now = Utc::now();
        let assignment = UserTenantRole {
            id: new_id(),
            user_id: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            role_id: role_id.to_string(),
            created_by: actor.map(str::to_string),
            updated_by: actor.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        Ok(self.repositories.user_tenant_role_repository().assign(assignment).await?)
    }

    pub async fn revoke(&self, tenant_id: &str, user_id: &str, role_id: &str) -> TenantResult<()> {
        let revoked = self
            .repositories
            .user_tenant_role_repository()
            .revoke(user_id, tenant_id, role_id)
            .await?;
        if !revoked {
            return Err(TenantError::not_found(
                "Role assignment",
                format!("{}:{}:{}", user_id, tenant_id, role_id),
            ));
        }
        Ok(())
    }

    pub async fn roles(&self, tenant_id: &str, user_id: &str) -> TenantResult<Vec<String>> {
        Ok(self
            .repositories
            .user_tenant_role_repository()
            .role_ids(user_id, tenant_id)
            .await?)
    }

    pub async fn users_with_role(&self, tenant_id: &str, role_id: &str) -> TenantResult<Vec<String>> {
        Ok(self
            .repositories
            .user_tenant_role_repository()
            .user_ids_with_role(tenant_id, role_id)
            .await?)
    }

    pub async fn has_role(&self, tenant_id: &str, user_id: &str, role_id: &str) -> TenantResult<bool> {
        Ok(self
            .repositories
            .user_tenant_role_repository()
            .has_role(user_id, tenant_id, role_id)
            .await?)
    }
}

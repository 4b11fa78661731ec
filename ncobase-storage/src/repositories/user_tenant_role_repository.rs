//! Per-tenant role assignment repository implementation using SeaORM

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use ncobase_api_types::UserTenantRole;
use ncobase_caching::RelationCache;
use ncobase_interfaces::{DatabaseError, Repository, UserTenantRoleRepository};

use crate::caches::StorageCaches;
use crate::connection::DatabaseConnection;
use crate::entities::{user_tenant_roles, UserTenantRoles};
use crate::error::{is_unique_violation, map_db_error};

/// SeaORM implementation of the UserTenantRoleRepository.
///
/// Cached with left = `<user>:<tenant>` and right = `<tenant>:<role>`, so the
/// forward list holds a user's roles in a tenant and the reverse list the
/// users holding a role in a tenant.
#[derive(Clone)]
pub struct SeaOrmUserTenantRoleRepository {
    db: DatabaseConnection,
    cache: RelationCache,
}

impl SeaOrmUserTenantRoleRepository {
    pub fn new(db: DatabaseConnection, caches: &StorageCaches) -> Self {
        Self {
            db,
            cache: caches.relation("user_tenant_role"),
        }
    }

    fn left(user_id: &str, tenant_id: &str) -> String {
        format!("{}:{}", user_id, tenant_id)
    }

    fn right(tenant_id: &str, role_id: &str) -> String {
        format!("{}:{}", tenant_id, role_id)
    }

    fn to_assignment(model: user_tenant_roles::Model) -> UserTenantRole {
        UserTenantRole {
            id: model.id,
            user_id: model.user_id,
            tenant_id: model.tenant_id,
            role_id: model.role_id,
            created_by: model.created_by,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    async fn find(
        &self,
        user_id: &str,
        tenant_id: &str,
        role_id: &str,
    ) -> Result<Option<UserTenantRole>, DatabaseError> {
        let model = UserTenantRoles::find()
            .filter(user_tenant_roles::Column::UserId.eq(user_id))
            .filter(user_tenant_roles::Column::TenantId.eq(tenant_id))
            .filter(user_tenant_roles::Column::RoleId.eq(role_id))
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find user tenant role", e))?;
        Ok(model.map(Self::to_assignment))
    }

    async fn forget(&self, user_id: &str, tenant_id: &str, role_id: &str) {
        self.cache
            .invalidate(&Self::left(user_id, tenant_id), &Self::right(tenant_id, role_id))
            .await;
    }
}

#[async_trait]
impl Repository for SeaOrmUserTenantRoleRepository {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.ping().await.map_err(DatabaseError::from)
    }
}

#[async_trait]
impl UserTenantRoleRepository for SeaOrmUserTenantRoleRepository {
    async fn assign(&self, assignment: UserTenantRole) -> Result<UserTenantRole, DatabaseError> {
        if let Some(existing) = self
            .find(&assignment.user_id, &assignment.tenant_id, &assignment.role_id)
            .await?
        {
            return Ok(existing);
        }

        let (user_id, tenant_id, role_id) = (
            assignment.user_id.clone(),
            assignment.tenant_id.clone(),
            assignment.role_id.clone(),
        );
        let active_model = user_tenant_roles::ActiveModel {
            id: Set(assignment.id),
            user_id: Set(assignment.user_id),
            tenant_id: Set(assignment.tenant_id),
            role_id: Set(assignment.role_id),
            created_by: Set(assignment.created_by),
            updated_by: Set(assignment.updated_by),
            created_at: Set(assignment.created_at),
            updated_at: Set(assignment.updated_at),
        };

        match UserTenantRoles::insert(active_model)
            .exec_without_returning(self.db.get_connection())
            .await
        {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {}
            Err(e) => return Err(map_db_error("assign user tenant role", e)),
        }
        self.forget(&user_id, &tenant_id, &role_id).await;

        self.find(&user_id, &tenant_id, &role_id).await?.ok_or_else(|| {
            DatabaseError::not_found("UserTenantRole", format!("{}:{}:{}", user_id, tenant_id, role_id))
        })
    }

    async fn revoke(&self, user_id: &str, tenant_id: &str, role_id: &str) -> Result<bool, DatabaseError> {
        let result = UserTenantRoles::delete_many()
            .filter(user_tenant_roles::Column::UserId.eq(user_id))
            .filter(user_tenant_roles::Column::TenantId.eq(tenant_id))
            .filter(user_tenant_roles::Column::RoleId.eq(role_id))
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("revoke user tenant role", e))?;

        self.forget(user_id, tenant_id, role_id).await;
        Ok(result.rows_affected > 0)
    }

    async fn role_ids(&self, user_id: &str, tenant_id: &str) -> Result<Vec<String>, DatabaseError> {
        let left = Self::left(user_id, tenant_id);
        if let Some(ids) = self.cache.get_forward(&left).await {
            return Ok(ids);
        }

        let ids: Vec<String> = UserTenantRoles::find()
            .select_only()
            .column(user_tenant_roles::Column::RoleId)
            .filter(user_tenant_roles::Column::UserId.eq(user_id))
            .filter(user_tenant_roles::Column::TenantId.eq(tenant_id))
            .order_by_asc(user_tenant_roles::Column::Id)
            .into_tuple()
            .all(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("list role ids", e))?;

        self.cache.set_forward(&left, &ids).await;
        Ok(ids)
    }

    async fn user_ids_with_role(&self, tenant_id: &str, role_id: &str) -> Result<Vec<String>, DatabaseError> {
        let right = Self::right(tenant_id, role_id);
        if let Some(ids) = self.cache.get_reverse(&right).await {
            return Ok(ids);
        }

        let ids: Vec<String> = UserTenantRoles::find()
            .select_only()
            .column(user_tenant_roles::Column::UserId)
            .filter(user_tenant_roles::Column::TenantId.eq(tenant_id))
            .filter(user_tenant_roles::Column::RoleId.eq(role_id))
            .order_by_asc(user_tenant_roles::Column::Id)
            .into_tuple()
            .all(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("list user ids with role", e))?;

        self.cache.set_reverse(&right, &ids).await;
        Ok(ids)
    }

    async fn has_role(&self, user_id: &str, tenant_id: &str, role_id: &str) -> Result<bool, DatabaseError> {
        let (left, right) = (Self::left(user_id, tenant_id), Self::right(tenant_id, role_id));
        if let Some(held) = self.cache.get_pair(&left, &right).await {
            return Ok(held);
        }

        let count = UserTenantRoles::find()
            .filter(user_tenant_roles::Column::UserId.eq(user_id))
            .filter(user_tenant_roles::Column::TenantId.eq(tenant_id))
            .filter(user_tenant_roles::Column::RoleId.eq(role_id))
            .count(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("check user tenant role", e))?;

        let held = count > 0;
        self.cache.set_pair(&left, &right, held).await;
        Ok(held)
    }

    async fn revoke_all(&self, user_id: &str, tenant_id: &str) -> Result<u64, DatabaseError> {
        let role_ids: Vec<String> = UserTenantRoles::find()
            .select_only()
            .column(user_tenant_roles::Column::RoleId)
            .filter(user_tenant_roles::Column::UserId.eq(user_id))
            .filter(user_tenant_roles::Column::TenantId.eq(tenant_id))
            .into_tuple()
            .all(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("list role ids", e))?;

        let result = UserTenantRoles::delete_many()
            .filter(user_tenant_roles::Column::UserId.eq(user_id))
            .filter(user_tenant_roles::Column::TenantId.eq(tenant_id))
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("revoke user tenant roles", e))?;

        let rights: Vec<String> = role_ids.iter().map(|role| Self::right(tenant_id, role)).collect();
        self.cache.invalidate_left(&Self::left(user_id, tenant_id), &rights).await;
        Ok(result.rows_affected)
    }

    async fn delete_all_by_tenant(&self, tenant_id: &str) -> Result<u64, DatabaseError> {
        let pairs: Vec<(String, String)> = UserTenantRoles::find()
            .select_only()
            .column(user_tenant_roles::Column::UserId)
            .column(user_tenant_roles::Column::RoleId)
            .filter(user_tenant_roles::Column::TenantId.eq(tenant_id))
            .into_tuple()
            .all(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("list user tenant roles", e))?;

        let result = UserTenantRoles::delete_many()
            .filter(user_tenant_roles::Column::TenantId.eq(tenant_id))
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("delete user tenant roles by tenant", e))?;

        for (user_id, role_id) in &pairs {
            self.forget(user_id, tenant_id, role_id).await;
        }
        Ok(result.rows_affected)
    }
}

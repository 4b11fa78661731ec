//! User membership repository implementation using SeaORM

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use ncobase_api_types::{CursorInput, CursorPage, UserTenant};
use ncobase_caching::{CacheAside, RelationCache};
use ncobase_interfaces::{DatabaseError, Repository, UserTenantRepository};

use crate::caches::StorageCaches;
use crate::connection::DatabaseConnection;
use crate::entities::{user_tenants, UserTenants};
use crate::error::{is_unique_violation, map_db_error};
use crate::pagination::fetch_page;

/// SeaORM implementation of the UserTenantRepository
#[derive(Clone)]
pub struct SeaOrmUserTenantRepository {
    db: DatabaseConnection,
    /// left = user id, right = tenant id
    cache: RelationCache,
    /// user id -> default tenant id, shared with the tenant repository
    default_tenant_ids: CacheAside<String>,
}

impl SeaOrmUserTenantRepository {
    pub fn new(db: DatabaseConnection, caches: &StorageCaches) -> Self {
        Self {
            db,
            cache: caches.relation("user_tenant"),
            default_tenant_ids: caches.aside("tenant_user", caches.policies().user_tenant),
        }
    }

    fn to_user_tenant(model: user_tenants::Model) -> UserTenant {
        UserTenant {
            id: model.id,
            user_id: model.user_id,
            tenant_id: model.tenant_id,
            created_by: model.created_by,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    async fn forget(&self, user_id: &str, tenant_id: &str) {
        self.cache.invalidate(user_id, tenant_id).await;
        self.default_tenant_ids.invalidate(&[user_id]).await;
    }

    async fn pluck(
        &self,
        select_column: user_tenants::Column,
        filter_column: user_tenants::Column,
        value: &str,
        action: &str,
    ) -> Result<Vec<String>, DatabaseError> {
        UserTenants::find()
            .select_only()
            .column(select_column)
            .filter(filter_column.eq(value))
            .order_by_asc(user_tenants::Column::CreatedAt)
            .order_by_asc(user_tenants::Column::Id)
            .into_tuple::<String>()
            .all(self.db.get_connection())
            .await
            .map_err(|e| map_db_error(action, e))
    }
}

#[async_trait]
impl Repository for SeaOrmUserTenantRepository {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.ping().await.map_err(DatabaseError::from)
    }
}

#[async_trait]
impl UserTenantRepository for SeaOrmUserTenantRepository {
    async fn add(&self, membership: UserTenant) -> Result<UserTenant, DatabaseError> {
        if let Some(existing) = self.find(&membership.user_id, &membership.tenant_id).await? {
            return Ok(existing);
        }

        let user_id = membership.user_id.clone();
        let tenant_id = membership.tenant_id.clone();
        let active_model = user_tenants::ActiveModel {
            id: Set(membership.id),
            user_id: Set(membership.user_id),
            tenant_id: Set(membership.tenant_id),
            created_by: Set(membership.created_by),
            updated_by: Set(membership.updated_by),
            created_at: Set(membership.created_at),
            updated_at: Set(membership.updated_at),
        };

        match UserTenants::insert(active_model)
            .exec_without_returning(self.db.get_connection())
            .await
        {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {}
            Err(e) => return Err(map_db_error("add user to tenant", e)),
        }
        self.forget(&user_id, &tenant_id).await;

        self.find(&user_id, &tenant_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("UserTenant", format!("{}:{}", user_id, tenant_id)))
    }

    async fn remove(&self, user_id: &str, tenant_id: &str) -> Result<bool, DatabaseError> {
        let result = UserTenants::delete_many()
            .filter(user_tenants::Column::UserId.eq(user_id))
            .filter(user_tenants::Column::TenantId.eq(tenant_id))
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("remove user from tenant", e))?;

        self.forget(user_id, tenant_id).await;
        Ok(result.rows_affected > 0)
    }

    async fn find(&self, user_id: &str, tenant_id: &str) -> Result<Option<UserTenant>, DatabaseError> {
        let model = UserTenants::find()
            .filter(user_tenants::Column::UserId.eq(user_id))
            .filter(user_tenants::Column::TenantId.eq(tenant_id))
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find user tenant", e))?;
        Ok(model.map(Self::to_user_tenant))
    }

    async fn find_default(&self, user_id: &str) -> Result<Option<UserTenant>, DatabaseError> {
        let model = UserTenants::find()
            .filter(user_tenants::Column::UserId.eq(user_id))
            .order_by_asc(user_tenants::Column::CreatedAt)
            .order_by_asc(user_tenants::Column::Id)
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find default user tenant", e))?;
        Ok(model.map(Self::to_user_tenant))
    }

    async fn is_member(&self, user_id: &str, tenant_id: &str) -> Result<bool, DatabaseError> {
        if let Some(member) = self.cache.get_pair(user_id, tenant_id).await {
            return Ok(member);
        }

        let count = UserTenants::find()
            .filter(user_tenants::Column::UserId.eq(user_id))
            .filter(user_tenants::Column::TenantId.eq(tenant_id))
            .count(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("check user tenant", e))?;

        let member = count > 0;
        self.cache.set_pair(user_id, tenant_id, member).await;
        Ok(member)
    }

    async fn tenant_ids_by_user(&self, user_id: &str) -> Result<Vec<String>, DatabaseError> {
        if let Some(ids) = self.cache.get_forward(user_id).await {
            return Ok(ids);
        }
        let ids = self
            .pluck(
                user_tenants::Column::TenantId,
                user_tenants::Column::UserId,
                user_id,
                "list tenant ids by user",
            )
            .await?;
        self.cache.set_forward(user_id, &ids).await;
        Ok(ids)
    }

    async fn user_ids_by_tenant(&self, tenant_id: &str) -> Result<Vec<String>, DatabaseError> {
        if let Some(ids) = self.cache.get_reverse(tenant_id).await {
            return Ok(ids);
        }
        let ids = self
            .pluck(
                user_tenants::Column::UserId,
                user_tenants::Column::TenantId,
                tenant_id,
                "list user ids by tenant",
            )
            .await?;
        self.cache.set_reverse(tenant_id, &ids).await;
        Ok(ids)
    }

    async fn list_by_tenant(
        &self,
        tenant_id: &str,
        input: CursorInput,
    ) -> Result<CursorPage<UserTenant>, DatabaseError> {
        fetch_page(
            self.db.get_connection(),
            UserTenants::find().filter(user_tenants::Column::TenantId.eq(tenant_id)),
            user_tenants::Column::Id,
            &input,
            "list user tenants",
            |model| Ok(Self::to_user_tenant(model)),
        )
        .await
    }

    async fn delete_all_by_tenant(&self, tenant_id: &str) -> Result<u64, DatabaseError> {
        let user_ids = self
            .pluck(
                user_tenants::Column::UserId,
                user_tenants::Column::TenantId,
                tenant_id,
                "list user ids by tenant",
            )
            .await?;

        let result = UserTenants::delete_many()
            .filter(user_tenants::Column::TenantId.eq(tenant_id))
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("delete user tenants by tenant", e))?;

        for user_id in &user_ids {
            self.forget(user_id, tenant_id).await;
        }
        Ok(result.rows_affected)
    }
}

//! Tenant repository implementation using SeaORM

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use ncobase_api_types::{CursorInput, CursorPage, Tenant};
use ncobase_caching::CacheAside;
use ncobase_interfaces::{DatabaseError, Repository, TenantRepository};

use crate::caches::StorageCaches;
use crate::connection::DatabaseConnection;
use crate::entities::{tenants, user_tenants, Tenants, UserTenants};
use crate::error::map_db_error;
use crate::pagination::fetch_page;

/// SeaORM implementation of the TenantRepository
#[derive(Clone)]
pub struct SeaOrmTenantRepository {
    db: DatabaseConnection,
    cache: CacheAside<Tenant>,
    /// slug -> tenant id
    slug_ids: CacheAside<String>,
    /// user id -> default tenant id
    user_ids: CacheAside<String>,
}

impl SeaOrmTenantRepository {
    pub fn new(db: DatabaseConnection, caches: &StorageCaches) -> Self {
        let policies = caches.policies();
        Self {
            db,
            cache: caches.aside("tenant", policies.tenant),
            slug_ids: caches.aside("tenant_slug", policies.tenant),
            user_ids: caches.aside("tenant_user", policies.user_tenant),
        }
    }

    fn to_tenant(model: tenants::Model) -> Tenant {
        Tenant {
            keywords: serde_json::from_value(model.keywords).unwrap_or_default(),
            id: model.id,
            name: model.name,
            slug: model.slug,
            tenant_type: model.tenant_type,
            title: model.title,
            url: model.url,
            logo: model.logo,
            logo_alt: model.logo_alt,
            copyright: model.copyright,
            description: model.description,
            disabled: model.disabled,
            extras: model.extras,
            expired_at: model.expired_at,
            created_by: model.created_by,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    fn to_active_model(tenant: Tenant) -> tenants::ActiveModel {
        tenants::ActiveModel {
            id: Set(tenant.id),
            name: Set(tenant.name),
            slug: Set(tenant.slug),
            tenant_type: Set(tenant.tenant_type),
            title: Set(tenant.title),
            url: Set(tenant.url),
            logo: Set(tenant.logo),
            logo_alt: Set(tenant.logo_alt),
            keywords: Set(serde_json::json!(tenant.keywords)),
            copyright: Set(tenant.copyright),
            description: Set(tenant.description),
            disabled: Set(tenant.disabled),
            extras: Set(tenant.extras),
            expired_at: Set(tenant.expired_at),
            created_by: Set(tenant.created_by),
            updated_by: Set(tenant.updated_by),
            created_at: Set(tenant.created_at),
            updated_at: Set(tenant.updated_at),
        }
    }

    async fn load(&self, id: &str) -> Result<Option<Tenant>, DatabaseError> {
        let tenant = Tenants::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find tenant by id", e))?;
        Ok(tenant.map(Self::to_tenant))
    }

    async fn remember(&self, tenant: &Tenant) {
        self.cache.set(&tenant.id, tenant).await;
        self.slug_ids.set(&tenant.slug, &tenant.id).await;
    }

    async fn forget(&self, id: &str, slugs: &[&str]) {
        let mut keys = vec![self.cache.key(id)];
        keys.extend(slugs.iter().map(|slug| self.slug_ids.key(slug)));
        self.cache.remove_keys(keys).await;
    }
}

#[async_trait]
impl Repository for SeaOrmTenantRepository {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.ping().await.map_err(DatabaseError::from)
    }
}

#[async_trait]
impl TenantRepository for SeaOrmTenantRepository {
    async fn create(&self, tenant: Tenant) -> Result<Tenant, DatabaseError> {
        let created = Self::to_active_model(tenant)
            .insert(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("create tenant", e))?;

        let tenant = Self::to_tenant(created);
        self.remember(&tenant).await;
        Ok(tenant)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>, DatabaseError> {
        self.cache.get_or_load(id, || self.load(id)).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, DatabaseError> {
        if let Some(id) = self.slug_ids.get(slug).await {
            if let Some(tenant) = self.find_by_id(&id).await? {
                if tenant.slug == slug {
                    return Ok(Some(tenant));
                }
            }
            self.slug_ids.invalidate(&[slug]).await;
        }

        let tenant = Tenants::find()
            .filter(tenants::Column::Slug.eq(slug))
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find tenant by slug", e))?
            .map(Self::to_tenant);

        if let Some(tenant) = &tenant {
            self.remember(tenant).await;
        }
        Ok(tenant)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<Tenant>, DatabaseError> {
        if let Some(id) = self.user_ids.get(user_id).await {
            if let Some(tenant) = self.find_by_id(&id).await? {
                return Ok(Some(tenant));
            }
            self.user_ids.invalidate(&[user_id]).await;
        }

        let membership = UserTenants::find()
            .filter(user_tenants::Column::UserId.eq(user_id))
            .order_by_asc(user_tenants::Column::CreatedAt)
            .order_by_asc(user_tenants::Column::Id)
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find tenant by user", e))?;

        let Some(membership) = membership else {
            return Ok(None);
        };
        let tenant = self.find_by_id(&membership.tenant_id).await?;
        if tenant.is_some() {
            self.user_ids.set(user_id, &membership.tenant_id).await;
        }
        Ok(tenant)
    }

    async fn update(&self, tenant: Tenant) -> Result<Tenant, DatabaseError> {
        let existing = Tenants::find_by_id(tenant.id.as_str())
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find tenant for update", e))?
            .ok_or_else(|| DatabaseError::not_found("Tenant", tenant.id.as_str()))?;

        let mut active_model = Self::to_active_model(tenant);
        active_model.created_at = Set(existing.created_at);
        active_model.created_by = Set(existing.created_by);
        active_model.updated_at = Set(Utc::now());

        let updated = active_model
            .update(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("update tenant", e))?;

        self.forget(&updated.id, &[existing.slug.as_str(), updated.slug.as_str()]).await;
        Ok(Self::to_tenant(updated))
    }

    async fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        let existing = Tenants::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find tenant for delete", e))?
            .ok_or_else(|| DatabaseError::not_found("Tenant", id))?;

        Tenants::delete_by_id(id)
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("delete tenant", e))?;

        self.forget(id, &[existing.slug.as_str()]).await;
        Ok(())
    }

    async fn list(&self, input: CursorInput) -> Result<CursorPage<Tenant>, DatabaseError> {
        fetch_page(
            self.db.get_connection(),
            Tenants::find(),
            tenants::Column::Id,
            &input,
            "list tenants",
            |model| Ok(Self::to_tenant(model)),
        )
        .await
    }

    async fn count(&self) -> Result<u64, DatabaseError> {
        Tenants::find()
            .count(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("count tenants", e))
    }
}

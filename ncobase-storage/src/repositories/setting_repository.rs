//! Setting repository implementation using SeaORM

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use ncobase_api_types::TenantSetting;
use ncobase_caching::CacheAside;
use ncobase_interfaces::{DatabaseError, Repository, SettingFilters, SettingRepository};

use crate::caches::StorageCaches;
use crate::connection::DatabaseConnection;
use crate::entities::{tenant_settings, TenantSettings};
use crate::error::{corrupt_row, map_db_error};

/// SeaORM implementation of the SettingRepository
#[derive(Clone)]
pub struct SeaOrmSettingRepository {
    db: DatabaseConnection,
    cache: CacheAside<TenantSetting>,
    /// `<tenant>:<key>` -> setting id
    key_ids: CacheAside<String>,
}

impl SeaOrmSettingRepository {
    pub fn new(db: DatabaseConnection, caches: &StorageCaches) -> Self {
        let policy = caches.policies().setting;
        Self {
            db,
            cache: caches.aside("tenant_setting", policy),
            key_ids: caches.aside("tenant_setting_key", policy),
        }
    }

    fn key_id(tenant_id: &str, key: &str) -> String {
        format!("{}:{}", tenant_id, key)
    }

    fn to_setting(model: tenant_settings::Model) -> Result<TenantSetting, DatabaseError> {
        let setting_type = model
            .setting_type
            .parse()
            .map_err(|e| corrupt_row("tenant_setting", &model.id, e))?;
        let scope = model.scope.parse().map_err(|e| corrupt_row("tenant_setting", &model.id, e))?;

        Ok(TenantSetting {
            id: model.id,
            tenant_id: model.tenant_id,
            setting_key: model.setting_key,
            setting_name: model.setting_name,
            setting_value: model.setting_value,
            default_value: model.default_value,
            setting_type,
            scope,
            category: model.category,
            description: model.description,
            validation: model.validation,
            sort_order: model.sort_order,
            is_public: model.is_public,
            is_required: model.is_required,
            is_readonly: model.is_readonly,
            extras: model.extras,
            created_by: model.created_by,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn to_active_model(setting: TenantSetting) -> tenant_settings::ActiveModel {
        tenant_settings::ActiveModel {
            id: Set(setting.id),
            tenant_id: Set(setting.tenant_id),
            setting_key: Set(setting.setting_key),
            setting_name: Set(setting.setting_name),
            setting_value: Set(setting.setting_value),
            default_value: Set(setting.default_value),
            setting_type: Set(setting.setting_type.as_str().to_string()),
            scope: Set(setting.scope.as_str().to_string()),
            category: Set(setting.category),
            description: Set(setting.description),
            validation: Set(setting.validation),
            sort_order: Set(setting.sort_order),
            is_public: Set(setting.is_public),
            is_required: Set(setting.is_required),
            is_readonly: Set(setting.is_readonly),
            extras: Set(setting.extras),
            created_by: Set(setting.created_by),
            updated_by: Set(setting.updated_by),
            created_at: Set(setting.created_at),
            updated_at: Set(setting.updated_at),
        }
    }

    async fn load(&self, id: &str) -> Result<Option<TenantSetting>, DatabaseError> {
        TenantSettings::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find setting by id", e))?
            .map(Self::to_setting)
            .transpose()
    }

    async fn remember(&self, setting: &TenantSetting) {
        self.cache.set(&setting.id, setting).await;
        self.key_ids
            .set(&Self::key_id(&setting.tenant_id, &setting.setting_key), &setting.id)
            .await;
    }

    async fn forget(&self, id: &str, key_ids: &[String]) {
        let mut keys = vec![self.cache.key(id)];
        keys.extend(key_ids.iter().map(|key| self.key_ids.key(key)));
        self.cache.remove_keys(keys).await;
    }
}

#[async_trait]
impl Repository for SeaOrmSettingRepository {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.ping().await.map_err(DatabaseError::from)
    }
}

#[async_trait]
impl SettingRepository for SeaOrmSettingRepository {
    async fn create(&self, setting: TenantSetting) -> Result<TenantSetting, DatabaseError> {
        let created = Self::to_active_model(setting)
            .insert(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("create setting", e))?;

        let setting = Self::to_setting(created)?;
        self.remember(&setting).await;
        Ok(setting)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TenantSetting>, DatabaseError> {
        self.cache.get_or_load(id, || self.load(id)).await
    }

    async fn find_by_key(&self, tenant_id: &str, key: &str) -> Result<Option<TenantSetting>, DatabaseError> {
        let key_id = Self::key_id(tenant_id, key);
        if let Some(id) = self.key_ids.get(&key_id).await {
            if let Some(setting) = self.find_by_id(&id).await? {
                if setting.tenant_id == tenant_id && setting.setting_key == key {
                    return Ok(Some(setting));
                }
            }
            self.key_ids.invalidate(&[key_id.as_str()]).await;
        }

        let setting = TenantSettings::find()
            .filter(tenant_settings::Column::TenantId.eq(tenant_id))
            .filter(tenant_settings::Column::SettingKey.eq(key))
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find setting by key", e))?
            .map(Self::to_setting)
            .transpose()?;

        if let Some(setting) = &setting {
            self.remember(setting).await;
        }
        Ok(setting)
    }

    async fn update(&self, setting: TenantSetting) -> Result<TenantSetting, DatabaseError> {
        let existing = TenantSettings::find_by_id(setting.id.as_str())
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find setting for update", e))?
            .ok_or_else(|| DatabaseError::not_found("TenantSetting", setting.id.as_str()))?;

        let mut active_model = Self::to_active_model(setting);
        active_model.created_at = Set(existing.created_at);
        active_model.created_by = Set(existing.created_by);
        active_model.updated_at = Set(Utc::now());

        let updated = active_model
            .update(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("update setting", e))?;
        let updated = Self::to_setting(updated)?;

        self.forget(
            &updated.id,
            &[
                Self::key_id(&existing.tenant_id, &existing.setting_key),
                Self::key_id(&updated.tenant_id, &updated.setting_key),
            ],
        )
        .await;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        let existing = TenantSettings::find_by_id(id)
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("find setting for delete", e))?
            .ok_or_else(|| DatabaseError::not_found("TenantSetting", id))?;

        TenantSettings::delete_by_id(id)
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("delete setting", e))?;

        self.forget(id, &[Self::key_id(&existing.tenant_id, &existing.setting_key)])
            .await;
        Ok(())
    }

    async fn list(&self, filters: SettingFilters) -> Result<Vec<TenantSetting>, DatabaseError> {
        let mut query = TenantSettings::find().filter(tenant_settings::Column::TenantId.eq(filters.tenant_id.as_str()));

        if let Some(scope) = filters.scope {
            query = query.filter(tenant_settings::Column::Scope.eq(scope.as_str()));
        }

        if let Some(category) = &filters.category {
            query = query.filter(tenant_settings::Column::Category.eq(category.as_str()));
        }

        if filters.public_only {
            query = query.filter(tenant_settings::Column::IsPublic.eq(true));
        }

        query
            .order_by_asc(tenant_settings::Column::SortOrder)
            .order_by_asc(tenant_settings::Column::SettingKey)
            .all(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("list settings", e))?
            .into_iter()
            .map(Self::to_setting)
            .collect()
    }

    async fn delete_all_by_tenant(&self, tenant_id: &str) -> Result<u64, DatabaseError> {
        let settings = self
            .list(SettingFilters {
                tenant_id: tenant_id.to_string(),
                ..Default::default()
            })
            .await?;

        let result = TenantSettings::delete_many()
            .filter(tenant_settings::Column::TenantId.eq(tenant_id))
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error("delete settings by tenant", e))?;

        for setting in &settings {
            self.forget(&setting.id, &[Self::key_id(tenant_id, &setting.setting_key)])
                .await;
        }
        Ok(result.rows_affected)
    }
}

//! Typed per-tenant settings

use chrono::Utc;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use ncobase_api_types::{
    new_id, CreateSettingBody, ReadTenantSetting, SettingScope, TenantSetting, UpdateSettingBody,
};
use ncobase_interfaces::{RepositoryFactory, SettingFilters};

use crate::calc::{encode_setting_value, infer_setting_type, read_setting, setting_value};
use crate::error::{TenantError, TenantResult};

pub struct SettingService {
    repositories: Arc<dyn RepositoryFactory>,
}

impl SettingService {
    pub fn new(repositories: Arc<dyn RepositoryFactory>) -> Self {
        Self { repositories }
    }

    fn check_required(setting: &TenantSetting) -> TenantResult<()> {
        if setting.is_required && setting.setting_value.is_empty() && setting.default_value.is_none() {
            return Err(TenantError::validation(
                "setting_value",
                format!("setting '{}' is required", setting.setting_key),
            ));
        }
        Ok(())
    }

    pub async fn create(
        &self,
        tenant_id: &str,
        body: CreateSettingBody,
        actor: Option<&str>,
    ) -> TenantResult<ReadTenantSetting> {
        body.validate()?;
        let repo = self.repositories.setting_repository();
        if repo.find_by_key(tenant_id, &body.setting_key).await?.is_some() {
            return Err(TenantError::Conflict(format!(
                "Setting '{}' already exists for tenant {}",
                body.setting_key, tenant_id
            )));
        }

        let now = Utc::now();
        let setting = TenantSetting {
            id: new_id(),
            tenant_id: tenant_id.to_string(),
            setting_name: body.setting_name.unwrap_or_else(|| body.setting_key.clone()),
            setting_key: body.setting_key,
            setting_value: body.setting_value,
            default_value: body.default_value,
            setting_type: body.setting_type.unwrap_or_default(),
            scope: body.scope.unwrap_or_default(),
            category: body.category.unwrap_or_else(|| "general".to_string()),
            description: body.description,
            validation: body.validation,
            sort_order: body.sort_order.unwrap_or(0),
            is_public: body.is_public.unwrap_or(false),
            is_required: body.is_required.unwrap_or(false),
            is_readonly: body.is_readonly.unwrap_or(false),
            extras: body.extras.unwrap_or_else(|| json!({})),
            created_by: actor.map(str::to_string),
            updated_by: actor.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        Self::check_required(&setting)?;

        Ok(read_setting(repo.create(setting).await?))
    }

    async fn load(&self, tenant_id: &str, key: &str) -> TenantResult<TenantSetting> {
        self.repositories
            .setting_repository()
            .find_by_key(tenant_id, key)
            .await?
            .ok_or_else(|| TenantError::not_found("Setting", key))
    }

    pub async fn get(&self, tenant_id: &str, key: &str) -> TenantResult<ReadTenantSetting> {
        Ok(read_setting(self.load(tenant_id, key).await?))
    }

    /// Changing the value of a read-only setting is refused; its metadata
    /// can still be edited
    pub async fn update(
        &self,
        tenant_id: &str,
        key: &str,
        body: UpdateSettingBody,
        actor: Option<&str>,
    ) -> TenantResult<ReadTenantSetting> {
        body.validate()?;
        let mut setting = self.load(tenant_id, key).await?;

        if let Some(value) = body.setting_value {
            if value != setting.setting_value {
                if setting.is_readonly {
                    return Err(TenantError::ReadOnly(setting.setting_key));
                }
                setting.setting_value = value;
            }
        }
        if let Some(name) = body.setting_name {
            setting.setting_name = name;
        }
        if body.default_value.is_some() {
            setting.default_value = body.default_value;
        }
        if let Some(setting_type) = body.setting_type {
            setting.setting_type = setting_type;
        }
        if let Some(scope) = body.scope {
            setting.scope = scope;
        }
        if let Some(category) = body.category {
            setting.category = category;
        }
        if body.description.is_some() {
            setting.description = body.description;
        }
        if body.validation.is_some() {
            setting.validation = body.validation;
        }
        if let Some(sort_order) = body.sort_order {
            setting.sort_order = sort_order;
        }
        if let Some(is_public) = body.is_public {
            setting.is_public = is_public;
        }
        if let Some(is_required) = body.is_required {
            setting.is_required = is_required;
        }
        if let Some(is_readonly) = body.is_readonly {
            setting.is_readonly = is_readonly;
        }
        if let Some(extras) = body.extras {
            setting.extras = extras;
        }
        setting.updated_by = actor.map(str::to_string);
        Self::check_required(&setting)?;

        let updated = self.repositories.setting_repository().update(setting).await?;
        Ok(read_setting(updated))
    }

    pub async fn delete(&self, tenant_id: &str, key: &str) -> TenantResult<()> {
        let setting = self.load(tenant_id, key).await?;
        self.repositories.setting_repository().delete(&setting.id).await?;
        Ok(())
    }

    pub async fn list(&self, filters: SettingFilters) -> TenantResult<Vec<ReadTenantSetting>> {
        let settings = self.repositories.setting_repository().list(filters).await?;
        Ok(settings.into_iter().map(read_setting).collect())
    }

    /// Coerced value of one setting
    pub async fn get_setting(&self, tenant_id: &str, key: &str) -> TenantResult<Value> {
        Ok(setting_value(&self.load(tenant_id, key).await?))
    }

    /// Upsert one setting from a JSON value. New settings take their type
    /// from the value.
    pub async fn set_setting(
        &self,
        tenant_id: &str,
        key: &str,
        value: Value,
        actor: Option<&str>,
    ) -> TenantResult<ReadTenantSetting> {
        if key.is_empty() {
            return Err(TenantError::validation("setting_key", "setting_key is required"));
        }
        let repo = self.repositories.setting_repository();

        if let Some(setting) = repo.find_by_key(tenant_id, key).await? {
            return self.overwrite(setting, &value, actor).await;
        }

        let body = CreateSettingBody {
            setting_key: key.to_string(),
            setting_value: encode_setting_value(&value),
            setting_type: Some(infer_setting_type(&value)),
            scope: Some(SettingScope::Tenant),
            ..Default::default()
        };
        match self.create(tenant_id, body, actor).await {
            // a concurrent writer created the key first
            Err(TenantError::Conflict(_)) => {
                let setting = repo
                    .find_by_key(tenant_id, key)
                    .await?
                    .ok_or_else(|| TenantError::not_found("Setting", key))?;
                self.overwrite(setting, &value, actor).await
            }
            result => result,
        }
    }

    async fn overwrite(
        &self,
        mut setting: TenantSetting,
        value: &Value,
        actor: Option<&str>,
    ) -> TenantResult<ReadTenantSetting> {
        if setting.is_readonly {
            return Err(TenantError::ReadOnly(setting.setting_key));
        }
        setting.setting_value = encode_setting_value(value);
        setting.updated_by = actor.map(str::to_string);
        Self::check_required(&setting)?;
        debug!("Updating setting {} for tenant {}", setting.setting_key, setting.tenant_id);
        Ok(read_setting(self.repositories.setting_repository().update(setting).await?))
    }

    /// Coerced values of every public setting, keyed by setting key
    pub async fn get_public_settings(&self, tenant_id: &str) -> TenantResult<BTreeMap<String, Value>> {
        let settings = self
            .repositories
            .setting_repository()
            .list(SettingFilters {
                tenant_id: tenant_id.to_string(),
                public_only: true,
                ..Default::default()
            })
            .await?;
        Ok(settings
            .iter()
            .map(|s| (s.setting_key.clone(), setting_value(s)))
            .collect())
    }

    /// Upsert several settings. Read-only keys are rejected before anything
    /// is written.
    pub async fn bulk_set(
        &self,
        tenant_id: &str,
        values: BTreeMap<String, Value>,
        actor: Option<&str>,
    ) -> TenantResult<Vec<ReadTenantSetting>> {
        let repo = self.repositories.setting_repository();
        for key in values.keys() {
            if let Some(existing) = repo.find_by_key(tenant_id, key).await? {
                if existing.is_readonly {
                    return Err(TenantError::ReadOnly(existing.setting_key));
                }
            }
        }

        let mut written = Vec::with_capacity(values.len());
        for (key, value) in values {
            written.push(self.set_setting(tenant_id, &key, value, actor).await?);
        }
        Ok(written)
    }
}

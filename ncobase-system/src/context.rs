//! Shared state handed to every seed step

use std::collections::HashMap;
use std::sync::Arc;

use ncobase_api_types::Tenant;
use ncobase_config::SystemConfig;
use ncobase_interfaces::RepositoryFactory;
use ncobase_storage::entities::{roles, users, Roles, Users};
use ncobase_storage::sea_orm::{ColumnTrait, DatabaseConnection as SeaConnection, EntityTrait, QueryFilter};
use ncobase_storage::DatabaseConnection;

use crate::error::StepError;

/// Recorded as `created_by` on seeded rows
pub const SEED_ACTOR: &str = "system";

pub struct SeedContext {
    db: DatabaseConnection,
    repositories: Arc<dyn RepositoryFactory>,
    config: SystemConfig,
    hash_cost: u32,
}

impl SeedContext {
    pub fn new(db: DatabaseConnection, repositories: Arc<dyn RepositoryFactory>, config: SystemConfig) -> Self {
        Self {
            db,
            repositories,
            config,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// bcrypt cost for seeded passwords
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn connection(&self) -> &SeaConnection {
        self.db.get_connection()
    }

    pub fn repositories(&self) -> &Arc<dyn RepositoryFactory> {
        &self.repositories
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn actor(&self) -> Option<String> {
        Some(SEED_ACTOR.to_string())
    }

    pub fn hash_password(&self) -> Result<String, StepError> {
        Ok(bcrypt::hash(&self.config.default_password, self.hash_cost)?)
    }

    pub async fn default_tenant(&self) -> Result<Tenant, StepError> {
        let slug = &self.config.default_tenant_slug;
        self.repositories
            .tenant_repository()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| StepError::missing(format!("default tenant '{}'", slug)))
    }

    /// Role IDs keyed by slug
    pub async fn role_ids(&self) -> Result<HashMap<String, String>, StepError> {
        let roles = Roles::find().all(self.connection()).await?;
        Ok(roles.into_iter().map(|r| (r.slug, r.id)).collect())
    }

    /// Role slugs keyed by ID
    pub async fn role_slugs(&self) -> Result<HashMap<String, String>, StepError> {
        let roles = Roles::find().all(self.connection()).await?;
        Ok(roles.into_iter().map(|r| (r.id, r.slug)).collect())
    }

    pub async fn role_id(&self, slug: &str) -> Result<String, StepError> {
        Roles::find()
            .filter(roles::Column::Slug.eq(slug))
            .one(self.connection())
            .await?
            .map(|r| r.id)
            .ok_or_else(|| StepError::missing(format!("role '{}'", slug)))
    }

    pub async fn user_id(&self, username: &str) -> Result<String, StepError> {
        Users::find()
            .filter(users::Column::Username.eq(username))
            .one(self.connection())
            .await?
            .map(|u| u.id)
            .ok_or_else(|| StepError::missing(format!("user '{}'", username)))
    }
}

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use ncobase_api_types::new_id;
use ncobase_storage::entities::{roles, Roles};
use ncobase_storage::sea_orm::{EntityTrait, PaginatorTrait, Set};

use super::SeedStep;
use crate::context::SeedContext;
use crate::defaults::DEFAULT_ROLES;
use crate::error::StepError;

pub struct RolesStep;

#[async_trait]
impl SeedStep for RolesStep {
    fn name(&self) -> &'static str {
        "roles"
    }

    async fn is_seeded(&self, ctx: &SeedContext) -> Result<bool, StepError> {
        Ok(Roles::find().count(ctx.connection()).await? > 0)
    }

    async fn seed(&self, ctx: &SeedContext) -> Result<(), StepError> {
        let now = Utc::now();
        let models = DEFAULT_ROLES.iter().map(|(slug, name, description)| roles::ActiveModel {
            id: Set(new_id()),
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            disabled: Set(false),
            description: Set(Some(description.to_string())),
            extras: Set(json!({})),
            created_by: Set(ctx.actor()),
            updated_by: Set(ctx.actor()),
            created_at: Set(now),
            updated_at: Set(now),
        });
        Roles::insert_many(models).exec_without_returning(ctx.connection()).await?;

        info!("Seeded {} roles", DEFAULT_ROLES.len());
        Ok(())
    }
}

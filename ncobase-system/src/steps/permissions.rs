use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use ncobase_api_types::new_id;
use ncobase_storage::entities::{permissions, role_permissions, Permissions, RolePermissions};
use ncobase_storage::sea_orm::{EntityTrait, PaginatorTrait, Set};

use super::SeedStep;
use crate::context::SeedContext;
use crate::defaults::{actions_for, role_grants, RESOURCES};
use crate::error::StepError;

/// One permission per resource action, granted to the default roles
pub struct PermissionsStep;

#[async_trait]
impl SeedStep for PermissionsStep {
    fn name(&self) -> &'static str {
        "permissions"
    }

    async fn is_seeded(&self, ctx: &SeedContext) -> Result<bool, StepError> {
        Ok(Permissions::find().count(ctx.connection()).await? > 0)
    }

    async fn seed(&self, ctx: &SeedContext) -> Result<(), StepError> {
        let role_ids = ctx.role_ids().await?;
        if role_ids.is_empty() {
            return Err(StepError::missing("roles"));
        }
        let now = Utc::now();

        let mut perms = Vec::new();
        let mut grants = Vec::new();
        for subject in RESOURCES {
            for action in actions_for(subject) {
                let permission_id = new_id();
                perms.push(permissions::ActiveModel {
                    id: Set(permission_id.clone()),
                    name: Set(format!("{}:{}", subject, action)),
                    action: Set(action.to_string()),
                    subject: Set(subject.to_string()),
                    description: Set(Some(format!("{} {}", action, subject))),
                    is_default: Set(true),
                    disabled: Set(false),
                    extras: Set(json!({})),
                    created_by: Set(ctx.actor()),
                    updated_by: Set(ctx.actor()),
                    created_at: Set(now),
                    updated_at: Set(now),
                });

                for (slug, role_id) in &role_ids {
                    if role_grants(slug, subject, action) {
                        grants.push(role_permissions::ActiveModel {
                            id: Set(new_id()),
                            role_id: Set(role_id.clone()),
                            permission_id: Set(permission_id.clone()),
                            created_by: Set(ctx.actor()),
                            updated_by: Set(ctx.actor()),
                            created_at: Set(now),
                            updated_at: Set(now),
                        });
                    }
                }
            }
        }

        let (perm_count, grant_count) = (perms.len(), grants.len());
        Permissions::insert_many(perms)
            .exec_without_returning(ctx.connection())
            .await?;
        if !grants.is_empty() {
            RolePermissions::insert_many(grants)
                .exec_without_returning(ctx.connection())
                .await?;
        }

        info!("Seeded {} permissions with {} role grants", perm_count, grant_count);
        Ok(())
    }
}

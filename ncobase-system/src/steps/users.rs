use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use ncobase_api_types::{new_id, UserTenant, UserTenantRole};
use ncobase_storage::entities::{users, Users};
use ncobase_storage::sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

use super::SeedStep;
use crate::context::SeedContext;
use crate::defaults::DEFAULT_USERS;
use crate::error::StepError;

/// Default accounts, each a member of the default tenant with one role
pub struct UsersStep;

#[async_trait]
impl SeedStep for UsersStep {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn is_seeded(&self, ctx: &SeedContext) -> Result<bool, StepError> {
        Ok(Users::find().count(ctx.connection()).await? > 0)
    }

    async fn seed(&self, ctx: &SeedContext) -> Result<(), StepError> {
        let tenant = ctx.default_tenant().await?;
        let memberships = ctx.repositories().user_tenant_repository();
        let assignments = ctx.repositories().user_tenant_role_repository();
        let password_hash = ctx.hash_password()?;

        for default_user in DEFAULT_USERS {
            let role_id = ctx.role_id(default_user.role).await?;
            let now = Utc::now();
            let user_id = new_id();

            users::ActiveModel {
                id: Set(user_id.clone()),
                username: Set(default_user.username.to_string()),
                email: Set(default_user.email.to_string()),
                phone: Set(None),
                password_hash: Set(password_hash.clone()),
                is_admin: Set(default_user.is_admin),
                is_certified: Set(true),
                disabled: Set(false),
                extras: Set(json!({})),
                created_by: Set(ctx.actor()),
                updated_by: Set(ctx.actor()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(ctx.connection())
            .await?;

            memberships
                .add(UserTenant {
                    id: new_id(),
                    user_id: user_id.clone(),
                    tenant_id: tenant.id.clone(),
                    created_by: ctx.actor(),
                    updated_by: ctx.actor(),
                    created_at: now,
                    updated_at: now,
                })
                .await?;

            assignments
                .assign(UserTenantRole {
                    id: new_id(),
                    user_id,
                    tenant_id: tenant.id.clone(),
                    role_id,
                    created_by: ctx.actor(),
                    updated_by: ctx.actor(),
                    created_at: now,
                    updated_at: now,
                })
                .await?;

            info!("Seeded user {} with role {}", default_user.username, default_user.role);
        }
        Ok(())
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use ncobase_api_types::{new_id, RelationKind, TenantRelation};
use ncobase_storage::entities::{groups, user_groups, Groups};
use ncobase_storage::sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

use super::SeedStep;
use crate::context::SeedContext;
use crate::defaults::{DEFAULT_GROUPS, ORGANIZATION_MEMBER};
use crate::error::StepError;

/// Group hierarchy of the default tenant; the admin account leads the root group
pub struct OrganizationStep;

#[async_trait]
impl SeedStep for OrganizationStep {
    fn name(&self) -> &'static str {
        "organization"
    }

    async fn is_seeded(&self, ctx: &SeedContext) -> Result<bool, StepError> {
        Ok(Groups::find().count(ctx.connection()).await? > 0)
    }

    async fn seed(&self, ctx: &SeedContext) -> Result<(), StepError> {
        let tenant = ctx.default_tenant().await?;
        let leader = ctx.user_id(ORGANIZATION_MEMBER).await?;
        let links = ctx.repositories().relation_repository(RelationKind::Group);
        let mut ids: HashMap<&str, String> = HashMap::new();
        let mut root = None;

        for &(slug, name, parent) in DEFAULT_GROUPS {
            let parent_id = match parent {
                Some(parent) => Some(
                    ids.get(parent)
                        .cloned()
                        .ok_or_else(|| StepError::missing(format!("parent group '{}'", parent)))?,
                ),
                None => None,
            };
            let is_root = parent_id.is_none();
            let now = Utc::now();
            let id = new_id();

            groups::ActiveModel {
                id: Set(id.clone()),
                name: Set(name.to_string()),
                slug: Set(slug.to_string()),
                disabled: Set(false),
                description: Set(None),
                leader_id: Set(is_root.then(|| leader.clone())),
                parent_id: Set(parent_id),
                extras: Set(json!({})),
                created_by: Set(ctx.actor()),
                updated_by: Set(ctx.actor()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(ctx.connection())
            .await?;

            links
                .add(TenantRelation {
                    id: new_id(),
                    kind: RelationKind::Group,
                    tenant_id: tenant.id.clone(),
                    target_id: id.clone(),
                    created_by: ctx.actor(),
                    updated_by: ctx.actor(),
                    created_at: now,
                    updated_at: now,
                })
                .await?;

            if is_root && root.is_none() {
                root = Some(id.clone());
            }
            ids.insert(slug, id);
        }

        let root = root.ok_or_else(|| StepError::missing("root group"))?;
        let now = Utc::now();
        user_groups::ActiveModel {
            id: Set(new_id()),
            user_id: Set(leader),
            group_id: Set(root),
            role: Set("leader".to_string()),
            created_by: Set(ctx.actor()),
            updated_by: Set(ctx.actor()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(ctx.connection())
        .await?;

        info!("Seeded {} groups for tenant {}", ids.len(), tenant.slug);
        Ok(())
    }
}

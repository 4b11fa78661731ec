use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use ncobase_api_types::{new_id, RelationKind, TenantRelation};
use ncobase_storage::entities::{menus, Menus};
use ncobase_storage::sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

use super::SeedStep;
use crate::context::SeedContext;
use crate::defaults::DEFAULT_MENUS;
use crate::error::StepError;

/// Navigation tree linked to the default tenant
pub struct MenusStep;

#[async_trait]
impl SeedStep for MenusStep {
    fn name(&self) -> &'static str {
        "menus"
    }

    async fn is_seeded(&self, ctx: &SeedContext) -> Result<bool, StepError> {
        Ok(Menus::find().count(ctx.connection()).await? > 0)
    }

    async fn seed(&self, ctx: &SeedContext) -> Result<(), StepError> {
        let tenant = ctx.default_tenant().await?;
        let links = ctx.repositories().relation_repository(RelationKind::Menu);
        // parents are listed before their children
        let mut ids: HashMap<&str, String> = HashMap::new();

        for (position, menu) in DEFAULT_MENUS.iter().enumerate() {
            let parent_id = match menu.parent {
                Some(parent) => Some(
                    ids.get(parent)
                        .cloned()
                        .ok_or_else(|| StepError::missing(format!("parent menu '{}'", parent)))?,
                ),
                None => None,
            };
            let now = Utc::now();
            let id = new_id();

            menus::ActiveModel {
                id: Set(id.clone()),
                name: Set(menu.name.to_string()),
                label: Set(menu.label.to_string()),
                slug: Set(menu.slug.to_string()),
                menu_type: Set(if menu.parent.is_some() { "menu" } else { "header" }.to_string()),
                path: Set(menu.path.to_string()),
                icon: Set(Some(menu.icon.to_string())),
                perms: Set(menu.perms.map(str::to_string)),
                parent_id: Set(parent_id),
                sort_order: Set(position as i32),
                hidden: Set(false),
                disabled: Set(false),
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
                    kind: RelationKind::Menu,
                    tenant_id: tenant.id.clone(),
                    target_id: id.clone(),
                    created_by: ctx.actor(),
                    updated_by: ctx.actor(),
                    created_at: now,
                    updated_at: now,
                })
                .await?;

            ids.insert(menu.slug, id);
        }

        info!("Seeded {} menus for tenant {}", ids.len(), tenant.slug);
        Ok(())
    }
}

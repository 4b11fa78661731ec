//! Tenant links to groups, menus, dictionaries and options

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use ncobase_api_types::{new_id, CursorInput, CursorPage, ReadTenantRelation, RelationKind, TenantRelation};
use ncobase_interfaces::{GroupLookup, RepositoryFactory};

use crate::error::{TenantError, TenantResult};

/// Name shown for a group the lookup could not resolve
pub fn placeholder_group_name(group_id: &str) -> String {
    format!("Group {}", group_id)
}

pub struct TenantRelationService {
    kind: RelationKind,
    repositories: Arc<dyn RepositoryFactory>,
    groups: Option<Arc<dyn GroupLookup>>,
}

impl TenantRelationService {
    pub fn new(
        kind: RelationKind,
        repositories: Arc<dyn RepositoryFactory>,
        groups: Option<Arc<dyn GroupLookup>>,
    ) -> Self {
        Self {
            kind,
            repositories,
            groups,
        }
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    fn entity(&self) -> &'static str {
        match self.kind {
            RelationKind::Group => "Tenant group",
            RelationKind::Menu => "Tenant menu",
            RelationKind::Dictionary => "Tenant dictionary",
            RelationKind::Option => "Tenant option",
        }
    }

    /// Idempotent: adding an existing pair returns the stored row
    pub async fn add(&self, tenant_id: &str, target_id: &str, actor: Option<&str>) -> TenantResult<ReadTenantRelation> {
        if target_id.is_empty() {
            return Err(TenantError::validation("target_id", "target_id is required"));
        }
        let now = Utc::now();
        let relation = TenantRelation {
            id: new_id(),
            kind: self.kind,
            tenant_id: tenant_id.to_string(),
            target_id: target_id.to_string(),
            created_by: actor.map(str::to_string),
            updated_by: actor.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        let added = self.repositories.relation_repository(self.kind).add(relation).await?;
        let mut enriched = self.enrich(vec![added]).await;
        enriched
            .pop()
            .ok_or_else(|| TenantError::not_found(self.entity(), target_id))
    }

    pub async fn get(&self, tenant_id: &str, target_id: &str) -> TenantResult<ReadTenantRelation> {
        let relation = self
            .repositories
            .relation_repository(self.kind)
            .find(tenant_id, target_id)
            .await?
            .ok_or_else(|| TenantError::not_found(self.entity(), format!("{}:{}", tenant_id, target_id)))?;
        let mut enriched = self.enrich(vec![relation]).await;
        enriched
            .pop()
            .ok_or_else(|| TenantError::not_found(self.entity(), target_id))
    }

    pub async fn remove(&self, tenant_id: &str, target_id: &str) -> TenantResult<()> {
        let removed = self
            .repositories
            .relation_repository(self.kind)
            .remove(tenant_id, target_id)
            .await?;
        if !removed {
            return Err(TenantError::not_found(self.entity(), format!("{}:{}", tenant_id, target_id)));
        }
        Ok(())
    }

    pub async fn exists(&self, tenant_id: &str, target_id: &str) -> TenantResult<bool> {
        Ok(self
            .repositories
            .relation_repository(self.kind)
            .exists(tenant_id, target_id)
            .await?)
    }

    pub async fn list(&self, tenant_id: &str, input: CursorInput) -> TenantResult<CursorPage<ReadTenantRelation>> {
        let page = self
            .repositories
            .relation_repository(self.kind)
            .list_by_tenant(tenant_id, input)
            .await?;

        let CursorPage {
            items,
            total,
            limit,
            cursor,
            next_cursor,
            prev_cursor,
            has_next_page,
            has_prev_page,
        } = page;

        Ok(CursorPage {
            items: self.enrich(items).await,
            total,
            limit,
            cursor,
            next_cursor,
            prev_cursor,
            has_next_page,
            has_prev_page,
        })
    }

    pub async fn target_ids(&self, tenant_id: &str) -> TenantResult<Vec<String>> {
        Ok(self
            .repositories
            .relation_repository(self.kind)
            .target_ids_by_tenant(tenant_id)
            .await?)
    }

    pub async fn tenant_ids(&self, target_id: &str) -> TenantResult<Vec<String>> {
        Ok(self
            .repositories
            .relation_repository(self.kind)
            .tenant_ids_by_target(target_id)
            .await?)
    }

    /// Attach group names; other kinds pass through unnamed
    async fn enrich(&self, relations: Vec<TenantRelation>) -> Vec<ReadTenantRelation> {
        if self.kind != RelationKind::Group || relations.is_empty() {
            return relations
                .into_iter()
                .map(|relation| ReadTenantRelation {
                    relation,
                    target_name: None,
                })
                .collect();
        }

        let ids: Vec<String> = relations.iter().map(|r| r.target_id.clone()).collect();
        let names: HashMap<String, String> = match &self.groups {
            Some(lookup) => match lookup.get_by_ids(&ids).await {
                Ok(groups) => groups.into_iter().map(|g| (g.id, g.name)).collect(),
                Err(e) => {
                    warn!("Group lookup failed, using placeholder names: {}", e);
                    HashMap::new()
                }
            },
            None => HashMap::new(),
        };

        relations
            .into_iter()
            .map(|relation| {
                let target_name = names
                    .get(&relation.target_id)
                    .cloned()
                    .unwrap_or_else(|| placeholder_group_name(&relation.target_id));
                ReadTenantRelation {
                    relation,
                    target_name: Some(target_name),
                }
            })
            .collect()
    }
}

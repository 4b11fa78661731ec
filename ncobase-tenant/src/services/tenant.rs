//! Tenant lifecycle

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use ncobase_api_types::{
    new_id, CreateTenantBody, CursorInput, CursorPage, RelationKind, Tenant, UpdateTenantBody,
};
use ncobase_interfaces::{RepositoryFactory, SearchDocument, SearchIndexer};

use crate::error::{TenantError, TenantResult};

const SEARCH_INDEX: &str = "tenants";

/// Lowercase letters, digits and inner hyphens
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub struct TenantService {
    repositories: Arc<dyn RepositoryFactory>,
    indexer: Arc<dyn SearchIndexer>,
}

impl TenantService {
    pub fn new(repositories: Arc<dyn RepositoryFactory>, indexer: Arc<dyn SearchIndexer>) -> Self {
        Self {
            repositories,
            indexer,
        }
    }

    pub async fn create(&self, body: CreateTenantBody, actor: Option<&str>) -> TenantResult<Tenant> {
        body.validate()?;
        if !is_valid_slug(&body.slug) {
            return Err(TenantError::validation(
                "slug",
                "slug may only contain lowercase letters, digits and hyphens",
            ));
        }

        let repo = self.repositories.tenant_repository();
        if repo.find_by_slug(&body.slug).await?.is_some() {
            return Err(TenantError::Conflict(format!("Tenant slug '{}' already exists", body.slug)));
        }

        let now = Utc::now();
        let tenant = Tenant {
            id: new_id(),
            name: body.name,
            slug: body.slug,
            tenant_type: body.tenant_type.unwrap_or_else(|| "private".to_string()),
            title: body.title,
            url: body.url,
            logo: body.logo,
            logo_alt: body.logo_alt,
            keywords: body.keywords,
            copyright: body.copyright,
            description: body.description,
            disabled: body.disabled.unwrap_or(false),
            extras: body.extras.unwrap_or_else(|| json!({})),
            expired_at: body.expired_at,
            created_by: actor.map(str::to_string),
            updated_by: actor.map(str::to_string),
            created_at: now,
            updated_at: now,
        };

        let created = repo.create(tenant).await?;
        info!("Created tenant {} ({})", created.slug, created.id);
        self.index(&created).await;
        Ok(created)
    }

    /// Look a tenant up by ID, then by slug
    pub async fn get(&self, id_or_slug: &str) -> TenantResult<Tenant> {
        let repo = self.repositories.tenant_repository();
        if let Some(tenant) = repo.find_by_id(id_or_slug).await? {
            return Ok(tenant);
        }
        repo.find_by_slug(id_or_slug)
            .await?
            .ok_or_else(|| TenantError::not_found("Tenant", id_or_slug))
    }

    /// The user's default tenant
    pub async fn get_by_user(&self, user_id: &str) -> TenantResult<Tenant> {
        self.repositories
            .tenant_repository()
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| TenantError::not_found("Tenant", format!("for user {}", user_id)))
    }

    pub async fn update(&self, id_or_slug: &str, body: UpdateTenantBody, actor: Option<&str>) -> TenantResult<Tenant> {
        body.validate()?;
        let mut tenant = self.get(id_or_slug).await?;
        let repo = self.repositories.tenant_repository();

        if let Some(slug) = body.slug {
            if slug != tenant.slug {
                if !is_valid_slug(&slug) {
                    return Err(TenantError::validation(
                        "slug",
                        "slug may only contain lowercase letters, digits and hyphens",
                    ));
                }
                if repo.find_by_slug(&slug).await?.is_some() {
                    return Err(TenantError::Conflict(format!("Tenant slug '{}' already exists", slug)));
                }
                tenant.slug = slug;
            }
        }
        if let Some(name) = body.name {
            tenant.name = name;
        }
        if let Some(tenant_type) = body.tenant_type {
            tenant.tenant_type = tenant_type;
        }
        if body.title.is_some() {
            tenant.title = body.title;
        }
        if body.url.is_some() {
            tenant.url = body.url;
        }
        if body.logo.is_some() {
            tenant.logo = body.logo;
        }
        if body.logo_alt.is_some() {
            tenant.logo_alt = body.logo_alt;
        }
        if let Some(keywords) = body.keywords {
            tenant.keywords = keywords;
        }
        if body.copyright.is_some() {
            tenant.copyright = body.copyright;
        }
        if body.description.is_some() {
            tenant.description = body.description;
        }
        if let Some(disabled) = body.disabled {
            tenant.disabled = disabled;
        }
        if let Some(extras) = body.extras {
            tenant.extras = extras;
        }
        if body.expired_at.is_some() {
            tenant.expired_at = body.expired_at;
        }
        tenant.updated_by = actor.map(str::to_string);

        let updated = repo.update(tenant).await?;
        self.index(&updated).await;
        Ok(updated)
    }

    /// Delete a tenant together with every row that references it
    pub async fn delete(&self, id_or_slug: &str) -> TenantResult<()> {
        let tenant = self.get(id_or_slug).await?;
        let id = tenant.id.as_str();
        let repos = &self.repositories;

        let quotas = repos.quota_repository().delete_all_by_tenant(id).await?;
        let billings = repos.billing_repository().delete_all_by_tenant(id).await?;
        let settings = repos.setting_repository().delete_all_by_tenant(id).await?;
        let mut relations = 0;
        for kind in RelationKind::ALL {
            relations += repos.relation_repository(*kind).delete_all_by_tenant(id).await?;
        }
        let roles = repos.user_tenant_role_repository().delete_all_by_tenant(id).await?;
        let members = repos.user_tenant_repository().delete_all_by_tenant(id).await?;
        repos.tenant_repository().delete(id).await?;

        info!(
            "Deleted tenant {} with {} quotas, {} billings, {} settings, {} relations, {} members, {} role assignments",
            tenant.slug, quotas, billings, settings, relations, members, roles
        );

        if let Err(e) = self.indexer.delete(SEARCH_INDEX, id).await {
            warn!("Failed to remove tenant {} from search index: {}", id, e);
        }
        Ok(())
    }

    pub async fn list(&self, input: CursorInput) -> TenantResult<CursorPage<Tenant>> {
        Ok(self.repositories.tenant_repository().list(input).await?)
    }

    pub async fn count(&self) -> TenantResult<u64> {
        Ok(self.repositories.tenant_repository().count().await?)
    }

    async fn index(&self, tenant: &Tenant) {
        let document = SearchDocument {
            index: SEARCH_INDEX.to_string(),
            id: tenant.id.clone(),
            tenant_id: Some(tenant.id.clone()),
            body: json!({
                "name": tenant.name,
                "slug": tenant.slug,
                "title": tenant.title,
                "description": tenant.description,
                "keywords": tenant.keywords,
            }),
        };
        if let Err(e) = self.indexer.index(document).await {
            warn!("Failed to index tenant {}: {}", tenant.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_format() {
        assert!(is_valid_slug("acme"));
        assert!(is_valid_slug("acme-2"));
        assert!(!is_valid_slug("Acme"));
        assert!(!is_valid_slug("acme_corp"));
        assert!(!is_valid_slug("-acme"));
        assert!(!is_valid_slug("acme-"));
        assert!(!is_valid_slug(""));
    }
}

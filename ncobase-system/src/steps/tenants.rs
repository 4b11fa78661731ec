use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use ncobase_api_types::{new_id, Tenant};

use super::SeedStep;
use crate::context::SeedContext;
use crate::error::StepError;

/// The bootstrap tenant every default account belongs to
pub struct TenantsStep;

#[async_trait]
impl SeedStep for TenantsStep {
    fn name(&self) -> &'static str {
        "tenants"
    }

    async fn is_seeded(&self, ctx: &SeedContext) -> Result<bool, StepError> {
        let slug = &ctx.config().default_tenant_slug;
        Ok(ctx.repositories().tenant_repository().find_by_slug(slug).await?.is_some())
    }

    async fn seed(&self, ctx: &SeedContext) -> Result<(), StepError> {
        let now = Utc::now();
        let slug = ctx.config().default_tenant_slug.clone();
        let tenant = Tenant {
            id: new_id(),
            name: "Ncobase".to_string(),
            title: Some("Ncobase".to_string()),
            slug,
            tenant_type: "system".to_string(),
            url: None,
            logo: None,
            logo_alt: None,
            keywords: vec!["ncobase".to_string()],
            copyright: None,
            description: Some("Default tenant created at initialization".to_string()),
            disabled: false,
            extras: json!({}),
            expired_at: None,
            created_by: ctx.actor(),
            updated_by: ctx.actor(),
            created_at: now,
            updated_at: now,
        };
        let created = ctx.repositories().tenant_repository().create(tenant).await?;

        info!("Seeded default tenant {} ({})", created.slug, created.id);
        Ok(())
    }
}

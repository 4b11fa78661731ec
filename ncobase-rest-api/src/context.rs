//! Shared handler state

use std::sync::Arc;

use ncobase_interfaces::RepositoryFactory;
use ncobase_system::Initializer;
use ncobase_tenant::TenantServices;

use crate::auth::JwtManager;
use crate::errors::RestResult;

#[derive(Clone)]
pub struct ApiContext {
    pub services: TenantServices,
    pub initializer: Arc<Initializer>,
    pub repositories: Arc<dyn RepositoryFactory>,
    pub auth: Arc<JwtManager>,
    /// Whether `POST /sys/initialize` may honour `allow_reinitialization`
    pub allow_reinitialization: bool,
}

impl ApiContext {
    pub fn new(
        services: TenantServices,
        initializer: Arc<Initializer>,
        repositories: Arc<dyn RepositoryFactory>,
        auth: Arc<JwtManager>,
    ) -> Self {
        Self {
            services,
            initializer,
            repositories,
            auth,
            allow_reinitialization: false,
        }
    }

    pub fn with_reinitialization(mut self, allowed: bool) -> Self {
        self.allow_reinitialization = allowed;
        self
    }

    /// Resolve a path segment that may be a tenant ID or slug
    pub async fn tenant_id(&self, id_or_slug: &str) -> RestResult<String> {
        Ok(self.services.tenants.get(id_or_slug).await?.id)
    }
}

//! Tenant module services
//!
//! Each service wraps one repository family from the factory, validates its
//! inputs and decorates rows with read-time values from [`crate::calc`].
//! [`TenantServices`] builds the whole set once at startup.

pub mod billing;
pub mod quota;
pub mod relation;
pub mod setting;
pub mod tenant;
pub mod user_tenant;
pub mod user_tenant_role;

use std::sync::Arc;

use ncobase_api_types::RelationKind;
use ncobase_config::BillingConfig;
use ncobase_interfaces::{GroupLookup, NoopSearchIndexer, RepositoryFactory, SearchIndexer};

pub use billing::BillingService;
pub use quota::QuotaService;
pub use relation::{placeholder_group_name, TenantRelationService};
pub use setting::SettingService;
pub use tenant::{is_valid_slug, TenantService};
pub use user_tenant::UserTenantService;
pub use user_tenant_role::UserTenantRoleService;

/// External collaborators the services can use when present
#[derive(Clone)]
pub struct Collaborators {
    pub indexer: Arc<dyn SearchIndexer>,
    pub groups: Option<Arc<dyn GroupLookup>>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            indexer: Arc::new(NoopSearchIndexer),
            groups: None,
        }
    }
}

#[derive(Clone)]
pub struct TenantServices {
    pub tenants: Arc<TenantService>,
    pub quotas: Arc<QuotaService>,
    pub billing: Arc<BillingService>,
    pub settings: Arc<SettingService>,
    pub user_tenants: Arc<UserTenantService>,
    pub user_tenant_roles: Arc<UserTenantRoleService>,
    groups: Arc<TenantRelationService>,
    menus: Arc<TenantRelationService>,
    dictionaries: Arc<TenantRelationService>,
    options: Arc<TenantRelationService>,
}

impl TenantServices {
    pub fn new(
        repositories: Arc<dyn RepositoryFactory>,
        collaborators: Collaborators,
        billing_config: BillingConfig,
    ) -> Self {
        let relation = |kind| {
            Arc::new(TenantRelationService::new(
                kind,
                repositories.clone(),
                collaborators.groups.clone(),
            ))
        };
        let groups = relation(RelationKind::Group);
        let menus = relation(RelationKind::Menu);
        let dictionaries = relation(RelationKind::Dictionary);
        let options = relation(RelationKind::Option);

        Self {
            tenants: Arc::new(TenantService::new(repositories.clone(), collaborators.indexer)),
            quotas: Arc::new(QuotaService::new(repositories.clone())),
            billing: Arc::new(BillingService::new(repositories.clone(), billing_config)),
            settings: Arc::new(SettingService::new(repositories.clone())),
            user_tenants: Arc::new(UserTenantService::new(repositories.clone())),
            user_tenant_roles: Arc::new(UserTenantRoleService::new(repositories)),
            groups,
            menus,
            dictionaries,
            options,
        }
    }

    pub fn relation(&self, kind: RelationKind) -> Arc<TenantRelationService> {
        match kind {
            RelationKind::Group => self.groups.clone(),
            RelationKind::Menu => self.menus.clone(),
            RelationKind::Dictionary => self.dictionaries.clone(),
            RelationKind::Option => self.options.clone(),
        }
    }
}

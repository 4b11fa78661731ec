//! # ncobase interfaces
//!
//! Repository contracts and external capability traits.
//!
//! Storage implements the repository traits, the tenant services consume them
//! behind `Arc<dyn ...>`, and tests can substitute their own implementations.
//! Collaborators that live outside this workspace (group directory, search
//! index) are reached only through the narrow traits in [`capabilities`].

pub mod capabilities;
pub mod database;

// Re-export commonly used types
pub use capabilities::{GroupLookup, NoopSearchIndexer, SearchDocument, SearchIndexer};
pub use database::{
    BillingFilters, BillingRepository, DatabaseError, QuotaRepository, Repository, RepositoryFactory,
    SettingFilters, SettingRepository, TenantRelationRepository, TenantRepository, UserTenantRepository,
    UserTenantRoleRepository,
};

//! Storage for the ncobase tenant backend
//!
//! SeaORM entities and migrations, the connection wrapper, and repositories
//! implementing the `ncobase-interfaces` traits with cache-aside reads in
//! front of every lookup.

pub mod caches;
pub mod connection;
pub mod entities;
pub mod error;
pub mod migrations;
mod pagination;
pub mod repositories;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use caches::{CachePolicies, StorageCaches};
pub use connection::DatabaseConnection;
pub use error::StorageError;
pub use migrations::Migrator;
pub use repositories::{
    SeaOrmBillingRepository, SeaOrmGroupLookup, SeaOrmQuotaRepository, SeaOrmRepositoryFactory,
    SeaOrmSettingRepository, SeaOrmTenantLinkRepository, SeaOrmTenantRepository, SeaOrmUserTenantRepository,
    SeaOrmUserTenantRoleRepository,
};

// Re-export sea-orm so dependants stay on the same version
pub use sea_orm;

//! SeaORM repositories with cache-aside reads

pub mod billing_repository;
pub mod factory;
pub mod group_lookup;
pub mod quota_repository;
pub mod relation_repository;
pub mod setting_repository;
pub mod tenant_repository;
pub mod user_tenant_repository;
pub mod user_tenant_role_repository;

pub use billing_repository::SeaOrmBillingRepository;
pub use factory::SeaOrmRepositoryFactory;
pub use group_lookup::SeaOrmGroupLookup;
pub use quota_repository::SeaOrmQuotaRepository;
pub use relation_repository::{
    SeaOrmTenantDictionaryRepository, SeaOrmTenantGroupRepository, SeaOrmTenantLinkRepository,
    SeaOrmTenantMenuRepository, SeaOrmTenantOptionRepository, TenantLink,
};
pub use setting_repository::SeaOrmSettingRepository;
pub use tenant_repository::SeaOrmTenantRepository;
pub use user_tenant_repository::SeaOrmUserTenantRepository;
pub use user_tenant_role_repository::SeaOrmUserTenantRoleRepository;

#[cfg(test)]
mod tests;

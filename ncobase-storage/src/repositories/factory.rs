//! Repository factory sharing one connection and one cache backend

use async_trait::async_trait;
use std::sync::Arc;

use ncobase_api_types::RelationKind;
use ncobase_interfaces::{
    BillingRepository, DatabaseError, QuotaRepository, RepositoryFactory, SettingRepository, TenantRelationRepository,
    TenantRepository, UserTenantRepository, UserTenantRoleRepository,
};

use crate::caches::StorageCaches;
use crate::connection::DatabaseConnection;

use super::{
    SeaOrmBillingRepository, SeaOrmQuotaRepository, SeaOrmSettingRepository, SeaOrmTenantDictionaryRepository,
    SeaOrmTenantGroupRepository, SeaOrmTenantMenuRepository, SeaOrmTenantOptionRepository, SeaOrmTenantRepository,
    SeaOrmUserTenantRepository, SeaOrmUserTenantRoleRepository,
};

/// SeaORM implementation of the RepositoryFactory
#[derive(Clone)]
pub struct SeaOrmRepositoryFactory {
    db: DatabaseConnection,
    caches: StorageCaches,
    tenant: Arc<SeaOrmTenantRepository>,
    quota: Arc<SeaOrmQuotaRepository>,
    billing: Arc<SeaOrmBillingRepository>,
    setting: Arc<SeaOrmSettingRepository>,
    groups: Arc<SeaOrmTenantGroupRepository>,
    menus: Arc<SeaOrmTenantMenuRepository>,
    dictionaries: Arc<SeaOrmTenantDictionaryRepository>,
    options: Arc<SeaOrmTenantOptionRepository>,
    user_tenant: Arc<SeaOrmUserTenantRepository>,
    user_tenant_role: Arc<SeaOrmUserTenantRoleRepository>,
}

impl SeaOrmRepositoryFactory {
    pub fn new(db: DatabaseConnection, caches: StorageCaches) -> Self {
        Self {
            tenant: Arc::new(SeaOrmTenantRepository::new(db.clone(), &caches)),
            quota: Arc::new(SeaOrmQuotaRepository::new(db.clone(), &caches)),
            billing: Arc::new(SeaOrmBillingRepository::new(db.clone(), &caches)),
            setting: Arc::new(SeaOrmSettingRepository::new(db.clone(), &caches)),
            groups: Arc::new(SeaOrmTenantGroupRepository::new(db.clone(), &caches)),
            menus: Arc::new(SeaOrmTenantMenuRepository::new(db.clone(), &caches)),
            dictionaries: Arc::new(SeaOrmTenantDictionaryRepository::new(db.clone(), &caches)),
            options: Arc::new(SeaOrmTenantOptionRepository::new(db.clone(), &caches)),
            user_tenant: Arc::new(SeaOrmUserTenantRepository::new(db.clone(), &caches)),
            user_tenant_role: Arc::new(SeaOrmUserTenantRoleRepository::new(db.clone(), &caches)),
            db,
            caches,
        }
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn caches(&self) -> &StorageCaches {
        &self.caches
    }
}

#[async_trait]
impl RepositoryFactory for SeaOrmRepositoryFactory {
    fn tenant_repository(&self) -> Arc<dyn TenantRepository> {
        self.tenant.clone()
    }

    fn quota_repository(&self) -> Arc<dyn QuotaRepository> {
        self.quota.clone()
    }

    fn billing_repository(&self) -> Arc<dyn BillingRepository> {
        self.billing.clone()
    }

    fn setting_repository(&self) -> Arc<dyn SettingRepository> {
        self.setting.clone()
    }

    fn relation_repository(&self, kind: RelationKind) -> Arc<dyn TenantRelationRepository> {
        match kind {
            RelationKind::Group => self.groups.clone(),
            RelationKind::Menu => self.menus.clone(),
            RelationKind::Dictionary => self.dictionaries.clone(),
            RelationKind::Option => self.options.clone(),
        }
    }

    fn user_tenant_repository(&self) -> Arc<dyn UserTenantRepository> {
        self.user_tenant.clone()
    }

    fn user_tenant_role_repository(&self) -> Arc<dyn UserTenantRoleRepository> {
        self.user_tenant_role.clone()
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.ping().await.map_err(DatabaseError::from)
    }
}

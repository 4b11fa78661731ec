//! Tenant link repositories (groups, menus, dictionaries, options)
//!
//! The four link tables share one shape, so one generic repository serves
//! them all; [`TenantLink`] supplies the per-table columns and conversions.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::marker::PhantomData;

use ncobase_api_types::{CursorInput, CursorPage, RelationKind, TenantRelation};
use ncobase_caching::RelationCache;
use ncobase_interfaces::{DatabaseError, Repository, TenantRelationRepository};

use crate::caches::StorageCaches;
use crate::connection::DatabaseConnection;
use crate::entities::{tenant_dictionaries, tenant_groups, tenant_menus, tenant_options};
use crate::error::{is_unique_violation, map_db_error};
use crate::pagination::fetch_page;

/// A `(tenant_id, <target>_id)` join table
pub trait TenantLink: EntityTrait {
    const KIND: RelationKind;
    /// Cache namespace, e.g. `tenant_group`
    const CACHE_NAME: &'static str;

    fn id_column() -> Self::Column;

    fn tenant_column() -> Self::Column;

    fn target_column() -> Self::Column;

    fn to_active_model(relation: TenantRelation) -> Self::ActiveModel;

    fn to_relation(model: Self::Model) -> TenantRelation;
}

macro_rules! tenant_link {
    ($module:ident, $kind:expr, $cache:literal, $column:ident, $field:ident) => {
        impl TenantLink for $module::Entity {
            const KIND: RelationKind = $kind;
            const CACHE_NAME: &'static str = $cache;

            fn id_column() -> Self::Column {
                $module::Column::Id
            }

            fn tenant_column() -> Self::Column {
                $module::Column::TenantId
            }

            fn target_column() -> Self::Column {
                $module::Column::$column
            }

            fn to_active_model(relation: TenantRelation) -> Self::ActiveModel {
                $module::ActiveModel {
                    id: Set(relation.id),
                    tenant_id: Set(relation.tenant_id),
                    $field: Set(relation.target_id),
                    created_by: Set(relation.created_by),
                    updated_by: Set(relation.updated_by),
                    created_at: Set(relation.created_at),
                    updated_at: Set(relation.updated_at),
                }
            }

            fn to_relation(model: Self::Model) -> TenantRelation {
                TenantRelation {
                    id: model.id,
                    kind: $kind,
                    tenant_id: model.tenant_id,
                    target_id: model.$field,
                    created_by: model.created_by,
                    updated_by: model.updated_by,
                    created_at: model.created_at,
                    updated_at: model.updated_at,
                }
            }
        }
    };
}

tenant_link!(tenant_groups, RelationKind::Group, "tenant_group", GroupId, group_id);
tenant_link!(tenant_menus, RelationKind::Menu, "tenant_menu", MenuId, menu_id);
tenant_link!(
    tenant_dictionaries,
    RelationKind::Dictionary,
    "tenant_dictionary",
    DictionaryId,
    dictionary_id
);
tenant_link!(tenant_options, RelationKind::Option, "tenant_option", OptionId, option_id);

/// SeaORM implementation of the TenantRelationRepository for one link table
pub struct SeaOrmTenantLinkRepository<E> {
    db: DatabaseConnection,
    /// left = tenant id, right = target id
    cache: RelationCache,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for SeaOrmTenantLinkRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            cache: self.cache.clone(),
            _entity: PhantomData,
        }
    }
}

pub type SeaOrmTenantGroupRepository = SeaOrmTenantLinkRepository<tenant_groups::Entity>;
pub type SeaOrmTenantMenuRepository = SeaOrmTenantLinkRepository<tenant_menus::Entity>;
pub type SeaOrmTenantDictionaryRepository = SeaOrmTenantLinkRepository<tenant_dictionaries::Entity>;
pub type SeaOrmTenantOptionRepository = SeaOrmTenantLinkRepository<tenant_options::Entity>;

impl<E> SeaOrmTenantLinkRepository<E>
where
    E: TenantLink,
    E::Model: Sync + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    E::Model: IntoActiveModel<E::ActiveModel>,
{
    pub fn new(db: DatabaseConnection, caches: &StorageCaches) -> Self {
        Self {
            db,
            cache: caches.relation(E::CACHE_NAME),
            _entity: PhantomData,
        }
    }

    async fn pluck(
        &self,
        select_column: E::Column,
        filter_column: E::Column,
        value: &str,
        action: &str,
    ) -> Result<Vec<String>, DatabaseError> {
        E::find()
            .select_only()
            .column(select_column)
            .filter(filter_column.eq(value))
            .order_by_asc(E::id_column())
            .into_tuple::<String>()
            .all(self.db.get_connection())
            .await
            .map_err(|e| map_db_error(action, e))
    }
}

#[async_trait]
impl<E> Repository for SeaOrmTenantLinkRepository<E>
where
    E: TenantLink,
    E::Model: Sync + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    E::Model: IntoActiveModel<E::ActiveModel>,
{
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.ping().await.map_err(DatabaseError::from)
    }
}

#[async_trait]
impl<E> TenantRelationRepository for SeaOrmTenantLinkRepository<E>
where
    E: TenantLink,
    E::Model: Sync + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    E::Model: IntoActiveModel<E::ActiveModel>,
{
    fn kind(&self) -> RelationKind {
        E::KIND
    }

    async fn add(&self, relation: TenantRelation) -> Result<TenantRelation, DatabaseError> {
        if let Some(existing) = self.find(&relation.tenant_id, &relation.target_id).await? {
            return Ok(existing);
        }

        let tenant_id = relation.tenant_id.clone();
        let target_id = relation.target_id.clone();
        let inserted = E::insert(E::to_active_model(relation))
            .exec_without_returning(self.db.get_connection())
            .await;

        match inserted {
            Ok(_) => {}
            // lost a race with a concurrent add of the same pair
            Err(e) if is_unique_violation(&e) => {}
            Err(e) => return Err(map_db_error(&format!("add tenant {}", E::KIND), e)),
        }
        self.cache.invalidate(&tenant_id, &target_id).await;

        self.find(&tenant_id, &target_id).await?.ok_or_else(|| {
            DatabaseError::not_found(E::CACHE_NAME, format!("{}:{}", tenant_id, target_id))
        })
    }

    async fn find(&self, tenant_id: &str, target_id: &str) -> Result<Option<TenantRelation>, DatabaseError> {
        let model = E::find()
            .filter(E::tenant_column().eq(tenant_id))
            .filter(E::target_column().eq(target_id))
            .one(self.db.get_connection())
            .await
            .map_err(|e| map_db_error(&format!("find tenant {}", E::KIND), e))?;
        Ok(model.map(E::to_relation))
    }

    async fn exists(&self, tenant_id: &str, target_id: &str) -> Result<bool, DatabaseError> {
        if let Some(exists) = self.cache.get_pair(tenant_id, target_id).await {
            return Ok(exists);
        }

        let count = E::find()
            .filter(E::tenant_column().eq(tenant_id))
            .filter(E::target_column().eq(target_id))
            .count(self.db.get_connection())
            .await
            .map_err(|e| map_db_error(&format!("check tenant {}", E::KIND), e))?;

        let exists = count > 0;
        self.cache.set_pair(tenant_id, target_id, exists).await;
        Ok(exists)
    }

    async fn remove(&self, tenant_id: &str, target_id: &str) -> Result<bool, DatabaseError> {
        let result = E::delete_many()
            .filter(E::tenant_column().eq(tenant_id))
            .filter(E::target_column().eq(target_id))
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error(&format!("remove tenant {}", E::KIND), e))?;

        self.cache.invalidate(tenant_id, target_id).await;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_tenant(
        &self,
        tenant_id: &str,
        input: CursorInput,
    ) -> Result<CursorPage<TenantRelation>, DatabaseError> {
        fetch_page(
            self.db.get_connection(),
            E::find().filter(E::tenant_column().eq(tenant_id)),
            E::id_column(),
            &input,
            &format!("list tenant {}s", E::KIND),
            |model| Ok(E::to_relation(model)),
        )
        .await
    }

    async fn target_ids_by_tenant(&self, tenant_id: &str) -> Result<Vec<String>, DatabaseError> {
        if let Some(ids) = self.cache.get_forward(tenant_id).await {
            return Ok(ids);
        }
        let ids = self
            .pluck(
                E::target_column(),
                E::tenant_column(),
                tenant_id,
                &format!("list {} ids by tenant", E::KIND),
            )
            .await?;
        self.cache.set_forward(tenant_id, &ids).await;
        Ok(ids)
    }

    async fn tenant_ids_by_target(&self, target_id: &str) -> Result<Vec<String>, DatabaseError> {
        if let Some(ids) = self.cache.get_reverse(target_id).await {
            return Ok(ids);
        }
        let ids = self
            .pluck(
                E::tenant_column(),
                E::target_column(),
                target_id,
                &format!("list tenant ids by {}", E::KIND),
            )
            .await?;
        self.cache.set_reverse(target_id, &ids).await;
        Ok(ids)
    }

    async fn delete_all_by_tenant(&self, tenant_id: &str) -> Result<u64, DatabaseError> {
        let targets = self
            .pluck(
                E::target_column(),
                E::tenant_column(),
                tenant_id,
                &format!("list {} ids by tenant", E::KIND),
            )
            .await?;

        let result = E::delete_many()
            .filter(E::tenant_column().eq(tenant_id))
            .exec(self.db.get_connection())
            .await
            .map_err(|e| map_db_error(&format!("delete tenant {}s by tenant", E::KIND), e))?;

        self.cache.invalidate_left(tenant_id, &targets).await;
        Ok(result.rows_affected)
    }
}

//! Tenant configuration setting entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenant_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub tenant_id: String,
    pub setting_key: String,
    pub setting_name: String,
    #[sea_orm(column_type = "Text")]
    pub setting_value: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub default_value: Option<String>,
    pub setting_type: String,
    pub scope: String,
    pub category: String,
    pub description: Option<String>,
    pub validation: Option<Json>,
    pub sort_order: i32,
    pub is_public: bool,
    pub is_required: bool,
    pub is_readonly: bool,
    pub extras: Json,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id"
    )]
    Tenant,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

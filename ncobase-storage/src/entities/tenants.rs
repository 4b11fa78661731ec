//! Tenant entity

use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub tenant_type: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub logo: Option<String>,
    pub logo_alt: Option<String>,
    /// JSON array of strings
    pub keywords: Json,
    pub copyright: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub disabled: bool,
    pub extras: Json,
    pub expired_at: Option<DateTimeUtc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tenant_quotas::Entity")]
    Quotas,
    #[sea_orm(has_many = "super::tenant_billings::Entity")]
    Billings,
    #[sea_orm(has_many = "super::tenant_settings::Entity")]
    Settings,
}

impl Related<super::tenant_quotas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotas.def()
    }
}

impl Related<super::tenant_billings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Billings.def()
    }
}

impl Related<super::tenant_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Settings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        let now = chrono::Utc::now();
        Self {
            tenant_type: Set("private".to_string()),
            keywords: Set(serde_json::json!([])),
            disabled: Set(false),
            extras: Set(serde_json::json!({})),
            created_at: Set(now),
            updated_at: Set(now),
            ..ActiveModelTrait::default()
        }
    }
}

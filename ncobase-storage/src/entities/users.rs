//! User account entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    /// bcrypt hash
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub is_certified: bool,
    pub disabled: bool,
    pub extras: Json,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_tenants::Entity")]
    UserTenants,
}

impl Related<super::user_tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserTenants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Navigation menu entity; a tree through `parent_id`

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menus")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub label: String,
    #[sea_orm(unique)]
    pub slug: String,
    /// `header`, `sidebar` or `submenu`
    pub menu_type: String,
    pub path: String,
    pub icon: Option<String>,
    /// Permission subject required to see the entry
    pub perms: Option<String>,
    pub parent_id: Option<String>,
    pub sort_order: i32,
    pub hidden: bool,
    pub disabled: bool,
    pub extras: Json,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

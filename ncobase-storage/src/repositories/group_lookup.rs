//! Group lookup backed by the local `groups` table

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use ncobase_api_types::GroupInfo;
use ncobase_interfaces::GroupLookup;

use crate::connection::DatabaseConnection;
use crate::entities::{groups, Groups};

#[derive(Clone)]
pub struct SeaOrmGroupLookup {
    db: DatabaseConnection,
}

impl SeaOrmGroupLookup {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GroupLookup for SeaOrmGroupLookup {
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<GroupInfo>, String> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let groups = Groups::find()
            .filter(groups::Column::Id.is_in(ids.iter().cloned()))
            .all(self.db.get_connection())
            .await
            .map_err(|e| format!("Failed to look up groups: {}", e))?;

        Ok(groups
            .into_iter()
            .map(|group| GroupInfo {
                id: group.id,
                name: group.name,
                slug: Some(group.slug),
            })
            .collect())
    }
}

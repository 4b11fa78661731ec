use ncobase_api_types::{BillingStatus, CursorDirection, CursorInput, SettingScope};
use serde::{Deserialize, Serialize};

/// `?cursor=&limit=&direction=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CursorQuery {
    pub cursor: Option<String>,
    pub limit: Option<u64>,
    pub direction: Option<CursorDirection>,
}

impl From<CursorQuery> for CursorInput {
    fn from(query: CursorQuery) -> Self {
        CursorInput {
            cursor: query.cursor,
            limit: query.limit,
            direction: query.direction,
        }
    }
}

// Cursor fields are repeated rather than flattened: flattened query structs
// lose the string-to-number coercion of the urlencoded deserializer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingListQuery {
    pub status: Option<BillingStatus>,
    pub cursor: Option<String>,
    pub limit: Option<u64>,
    pub direction: Option<CursorDirection>,
}

impl BillingListQuery {
    pub fn cursor_input(&self) -> CursorInput {
        CursorInput {
            cursor: self.cursor.clone(),
            limit: self.limit,
            direction: self.direction,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingListQuery {
    pub scope: Option<SettingScope>,
    pub category: Option<String>,
    #[serde(default)]
    pub public_only: bool,
}

//! Cursor windows over primary keys
//!
//! IDs are UUID v7 strings, so ordering by ID is creation order.

use ncobase_api_types::{CursorDirection, CursorInput, CursorPage};
use ncobase_interfaces::DatabaseError;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select};

use crate::error::map_db_error;

/// Fetch one page of `select` keyed on `id_column`.
///
/// `total` counts the whole filtered set, not just the window.
pub(crate) async fn fetch_page<E, C, T, F>(
    db: &C,
    select: Select<E>,
    id_column: E::Column,
    input: &CursorInput,
    action: &str,
    convert: F,
) -> Result<CursorPage<T>, DatabaseError>
where
    E: EntityTrait,
    E::Model: Sync + 'static,
    C: ConnectionTrait,
    F: Fn(E::Model) -> Result<T, DatabaseError>,
    T: HasId,
{
    let total = select
        .clone()
        .count(db)
        .await
        .map_err(|e| map_db_error(action, e))?;

    let mut window = select;
    if let Some(cursor) = input.cursor() {
        window = match input.direction() {
            CursorDirection::Next => window.filter(id_column.gt(cursor)),
            CursorDirection::Prev => window.filter(id_column.lt(cursor)),
        };
    }
    window = match input.direction() {
        CursorDirection::Next => window.order_by_asc(id_column),
        CursorDirection::Prev => window.order_by_desc(id_column),
    };

    let rows = window
        .limit(input.limit() + 1)
        .all(db)
        .await
        .map_err(|e| map_db_error(action, e))?;
    let items = rows.into_iter().map(convert).collect::<Result<Vec<_>, _>>()?;

    Ok(CursorPage::from_window(items, input, total, |item: &T| item.id().to_string()))
}

/// Records addressable by their primary key
pub(crate) trait HasId {
    fn id(&self) -> &str;
}

macro_rules! has_id {
    ($($ty:ty),+ $(,)?) => {
        $(impl HasId for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })+
    };
}

has_id!(
    ncobase_api_types::Tenant,
    ncobase_api_types::TenantBilling,
    ncobase_api_types::TenantRelation,
    ncobase_api_types::UserTenant,
);

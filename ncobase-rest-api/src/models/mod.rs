//! Response envelope and query parameter types

pub mod query;
pub mod response;

pub use query::{BillingListQuery, CursorQuery, SettingListQuery};
pub use response::{ApiResponse, HealthResponse, PaginationMeta, ResponseMeta};

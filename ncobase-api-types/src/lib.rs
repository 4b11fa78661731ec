//! Shared API types for the ncobase tenant backend
//!
//! Every layer speaks these types: repositories return the domain records,
//! services decorate them into `Read*` views with derived fields, and the
//! REST layer serializes both together with the request bodies defined here.

pub mod domain;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod pagination;
pub mod requests;
pub mod views;

// Re-export main types for convenience
pub use domain::{
    Tenant, TenantBilling, TenantQuota, TenantRelation, TenantSetting, UserTenant, UserTenantRole,
};
pub use enums::{
    BillingPeriod, BillingStatus, ParseEnumError, QuotaType, QuotaUnit, RelationKind, SettingScope, SettingType,
};
pub use errors::{ApiError, FieldError};
pub use ids::new_id;
pub use pagination::{CursorDirection, CursorInput, CursorPage};
pub use requests::{
    AddRelationBody, AddUserTenantBody, AssignRoleBody, BulkSettingsBody, CreateBillingBody, CreateQuotaBody,
    CreateSettingBody, CreateTenantBody, GenerateInvoiceBody, InitializeBody, ProcessPaymentBody, QuotaCheckBody,
    QuotaUsageBody, SetSettingBody, UpdateBillingBody, UpdateQuotaBody, UpdateSettingBody, UpdateTenantBody,
};
pub use views::{
    BillingSummary, GroupInfo, InitializationReport, InitializationStatus, QuotaCheckResult, ReadTenantBilling,
    ReadTenantQuota, ReadTenantRelation, ReadTenantSetting, StepOutcome, StepReport,
};

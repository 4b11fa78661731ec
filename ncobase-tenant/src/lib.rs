//! # ncobase tenant module
//!
//! Services for tenants and everything scoped to them: quotas, billing,
//! settings, links to groups/menus/dictionaries/options, user membership and
//! per-tenant roles.

pub mod calc;
pub mod error;
pub mod services;

pub use error::{TenantError, TenantResult};
pub use services::{
    BillingService, Collaborators, QuotaService, SettingService, TenantRelationService, TenantService,
    TenantServices, UserTenantRoleService, UserTenantService,
};

//! Seed steps in execution order
//!
//! Later steps look up rows written by earlier ones (role IDs, the default
//! tenant, the admin user), so the order returned by [`default_steps`] is
//! part of the contract.

mod casbin;
mod menus;
mod organization;
mod permissions;
mod roles;
mod tenants;
mod users;

use async_trait::async_trait;

use crate::context::SeedContext;
use crate::error::StepError;

pub use casbin::CasbinPoliciesStep;
pub use menus::MenusStep;
pub use organization::OrganizationStep;
pub use permissions::PermissionsStep;
pub use roles::RolesStep;
pub use tenants::TenantsStep;
pub use users::UsersStep;

#[async_trait]
pub trait SeedStep: Send + Sync {
    fn name(&self) -> &'static str;

    /// True when the step's data is already present and seeding is skipped
    async fn is_seeded(&self, ctx: &SeedContext) -> Result<bool, StepError>;

    async fn seed(&self, ctx: &SeedContext) -> Result<(), StepError>;
}

pub fn default_steps() -> Vec<Box<dyn SeedStep>> {
    vec![
        Box::new(RolesStep),
        Box::new(PermissionsStep),
        Box::new(TenantsStep),
        Box::new(UsersStep),
        Box::new(MenusStep),
        Box::new(CasbinPoliciesStep),
        Box::new(OrganizationStep),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        let names: Vec<_> = default_steps().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["roles", "permissions", "tenants", "users", "menus", "casbin_policies", "organization"]
        );
    }
}

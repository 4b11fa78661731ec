//! Sea-ORM entity definitions

pub mod casbin_rules;
pub mod groups;
pub mod menus;
pub mod permissions;
pub mod role_permissions;
pub mod roles;
pub mod system_states;
pub mod tenant_billings;
pub mod tenant_dictionaries;
pub mod tenant_groups;
pub mod tenant_menus;
pub mod tenant_options;
pub mod tenant_quotas;
pub mod tenant_settings;
pub mod tenants;
pub mod user_groups;
pub mod user_tenant_roles;
pub mod user_tenants;
pub mod users;

pub use casbin_rules::Entity as CasbinRules;
pub use groups::Entity as Groups;
pub use menus::Entity as Menus;
pub use permissions::Entity as Permissions;
pub use role_permissions::Entity as RolePermissions;
pub use roles::Entity as Roles;
pub use system_states::Entity as SystemStates;
pub use tenant_billings::Entity as TenantBillings;
pub use tenant_dictionaries::Entity as TenantDictionaries;
pub use tenant_groups::Entity as TenantGroups;
pub use tenant_menus::Entity as TenantMenus;
pub use tenant_options::Entity as TenantOptions;
pub use tenant_quotas::Entity as TenantQuotas;
pub use tenant_settings::Entity as TenantSettings;
pub use tenants::Entity as Tenants;
pub use user_groups::Entity as UserGroups;
pub use user_tenant_roles::Entity as UserTenantRoles;
pub use user_tenants::Entity as UserTenants;
pub use users::Entity as Users;

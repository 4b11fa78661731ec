//! Seed data

/// (slug, name, description)
pub const DEFAULT_ROLES: &[(&str, &str, &str)] = &[
    ("super-admin", "Super Administrator", "Full access to every resource"),
    ("admin", "Administrator", "Manages tenants and their resources"),
    ("user", "User", "Read access to tenant resources"),
];

pub const SUPER_ADMIN_ROLE: &str = "super-admin";
pub const ADMIN_ROLE: &str = "admin";
pub const USER_ROLE: &str = "user";

pub const RESOURCES: &[&str] = &["tenant", "quota", "billing", "setting", "user", "menu", "system"];

pub const SYSTEM_RESOURCE: &str = "system";

/// Actions available on a resource
pub fn actions_for(resource: &str) -> &'static [&'static str] {
    if resource == SYSTEM_RESOURCE {
        &["manage"]
    } else {
        &["read", "write", "delete"]
    }
}

/// Whether a default role is granted `action` on `subject`
pub fn role_grants(role_slug: &str, subject: &str, action: &str) -> bool {
    match role_slug {
        SUPER_ADMIN_ROLE => true,
        ADMIN_ROLE => subject != SYSTEM_RESOURCE,
        USER_ROLE => action == "read",
        _ => false,
    }
}

pub struct DefaultUser {
    pub username: &'static str,
    pub email: &'static str,
    pub role: &'static str,
    pub is_admin: bool,
}

pub const DEFAULT_USERS: &[DefaultUser] = &[
    DefaultUser {
        username: "super",
        email: "super@ncobase.local",
        role: SUPER_ADMIN_ROLE,
        is_admin: true,
    },
    DefaultUser {
        username: "admin",
        email: "admin@ncobase.local",
        role: ADMIN_ROLE,
        is_admin: true,
    },
    DefaultUser {
        username: "user",
        email: "user@ncobase.local",
        role: USER_ROLE,
        is_admin: false,
    },
];

/// Username of the account that joins the root group
pub const ORGANIZATION_MEMBER: &str = "admin";

pub struct DefaultMenu {
    pub slug: &'static str,
    pub name: &'static str,
    pub label: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
    pub perms: Option<&'static str>,
    pub parent: Option<&'static str>,
}

/// Parents come before their children
pub const DEFAULT_MENUS: &[DefaultMenu] = &[
    DefaultMenu {
        slug: "dashboard",
        name: "dashboard",
        label: "Dashboard",
        path: "/dashboard",
        icon: "dashboard",
        perms: None,
        parent: None,
    },
    DefaultMenu {
        slug: "system",
        name: "system",
        label: "System",
        path: "/system",
        icon: "settings",
        perms: Some("system"),
        parent: None,
    },
    DefaultMenu {
        slug: "system-tenants",
        name: "tenants",
        label: "Tenants",
        path: "/system/tenants",
        icon: "building",
        perms: Some("tenant"),
        parent: Some("system"),
    },
    DefaultMenu {
        slug: "system-users",
        name: "users",
        label: "Users",
        path: "/system/users",
        icon: "users",
        perms: Some("user"),
        parent: Some("system"),
    },
    DefaultMenu {
        slug: "system-settings",
        name: "settings",
        label: "Settings",
        path: "/system/settings",
        icon: "sliders",
        perms: Some("setting"),
        parent: Some("system"),
    },
];

/// (slug, name, parent slug)
pub const DEFAULT_GROUPS: &[(&str, &str, Option<&str>)] = &[
    ("headquarters", "Headquarters", None),
    ("engineering", "Engineering", Some("headquarters")),
    ("operations", "Operations", Some("headquarters")),
];

//! HTTP handlers

pub mod billing;
pub mod health;
pub mod quotas;
pub mod relations;
pub mod settings;
pub mod system;
pub mod tenants;
pub mod users;

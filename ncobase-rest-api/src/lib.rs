//! # ncobase REST API
//!
//! Axum routes for tenants and their quotas, billing, settings, relations,
//! members and roles, plus system initialization. Every response uses the
//! `{code, message, data}` envelope; mutating routes require a Bearer JWT.

pub mod app;
pub mod auth;
pub mod context;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod models;

pub use app::{create_rest_app, AppConfig};
pub use auth::{Actor, JwtClaims, JwtManager};
pub use context::ApiContext;
pub use errors::{RestError, RestResult};
pub use models::*;

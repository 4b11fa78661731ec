//! Router setup

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use ncobase_config::ServerConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{auth::authenticate, context::ApiContext, handlers};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_prefix: String,
    pub enable_cors: bool,
    pub enable_tracing: bool,
    pub request_timeout: Duration,
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api/v1".to_string(),
            enable_cors: true,
            enable_tracing: true,
            request_timeout: Duration::from_secs(30),
            body_limit: 2 * 1024 * 1024,
        }
    }
}

impl From<&ServerConfig> for AppConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            api_prefix: server.api_prefix.clone(),
            enable_cors: server.enable_cors,
            enable_tracing: server.enable_request_tracing,
            request_timeout: server.request_timeout,
            body_limit: server.body_limit,
        }
    }
}

pub fn create_rest_app(context: ApiContext, config: AppConfig) -> Router {
    let api = create_api_router().route_layer(middleware::from_fn_with_state(context.clone(), authenticate));

    let mut app = Router::new()
        // Health endpoints (no prefix, no auth)
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check))
        .nest(&config.api_prefix, api)
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(TimeoutLayer::new(config.request_timeout))
        .with_state(context);

    if config.enable_cors {
        app = app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));
    }
    if config.enable_tracing {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

fn create_api_router() -> Router<ApiContext> {
    use handlers::{billing, quotas, relations, settings, system, tenants, users};

    Router::new()
        // Tenants
        .route("/tenants", get(tenants::list_tenants).post(tenants::create_tenant))
        .route(
            "/tenants/{tenant}",
            get(tenants::get_tenant)
                .put(tenants::update_tenant)
                .delete(tenants::delete_tenant),
        )
        // Quotas
        .route(
            "/tenants/{tenant}/quotas",
            get(quotas::list_quotas).post(quotas::create_quota),
        )
        .route(
            "/tenants/{tenant}/quotas/usage",
            get(quotas::get_usage).post(quotas::update_usage),
        )
        .route("/tenants/{tenant}/quotas/check", post(quotas::check_quota))
        .route(
            "/tenants/{tenant}/quotas/{quota_id}",
            get(quotas::get_quota)
                .put(quotas::update_quota)
                .delete(quotas::delete_quota),
        )
        // Billing
        .route("/billing/overdue", post(billing::mark_overdue))
        .route(
            "/tenants/{tenant}/billing",
            get(billing::list_billing).post(billing::create_billing),
        )
        .route("/tenants/{tenant}/billing/summary", get(billing::get_summary))
        .route("/tenants/{tenant}/billing/invoice", post(billing::generate_invoice))
        .route(
            "/tenants/{tenant}/billing/{billing_id}",
            get(billing::get_billing)
                .put(billing::update_billing)
                .delete(billing::delete_billing),
        )
        .route(
            "/tenants/{tenant}/billing/{billing_id}/payment",
            post(billing::process_payment),
        )
        // Settings
        .route(
            "/tenants/{tenant}/settings",
            get(settings::list_settings)
                .post(settings::create_setting)
                .put(settings::bulk_set),
        )
        .route("/tenants/{tenant}/settings/public", get(settings::public_settings))
        .route(
            "/tenants/{tenant}/settings/{key}",
            get(settings::get_setting)
                .put(settings::update_setting)
                .delete(settings::delete_setting),
        )
        .route("/tenants/{tenant}/settings/{key}/value", axum::routing::put(settings::set_value))
        // Members and roles
        .route(
            "/tenants/{tenant}/users",
            get(users::list_members).post(users::add_member),
        )
        .route("/tenants/{tenant}/users/{user_id}", axum::routing::delete(users::remove_member))
        .route(
            "/tenants/{tenant}/users/{user_id}/roles",
            get(users::list_roles).post(users::assign_role),
        )
        .route(
            "/tenants/{tenant}/users/{user_id}/roles/{role_id}",
            axum::routing::delete(users::revoke_role),
        )
        .route("/users/{user_id}/tenants", get(users::user_tenants))
        .route("/users/{user_id}/tenant", get(users::user_tenant))
        // Groups, menus, dictionaries and options
        .route(
            "/tenants/{tenant}/{kind}",
            get(relations::list_relations).post(relations::add_relation),
        )
        .route(
            "/tenants/{tenant}/{kind}/{target_id}",
            get(relations::get_relation).delete(relations::remove_relation),
        )
        // System
        .route("/sys/initialize", post(system::initialize))
        .route("/sys/status", get(system::status))
}

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use ncobase_config::{AuthConfig, BillingConfig, SystemConfig};
use ncobase_interfaces::RepositoryFactory;
use ncobase_rest_api::{create_rest_app, ApiContext, AppConfig, JwtManager};
use ncobase_storage::testing::TestDatabase;
use ncobase_system::{Initializer, SeedContext};
use ncobase_tenant::{Collaborators, TenantServices};

struct TestApp {
    router: Router,
    token: String,
    _db: TestDatabase,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_auth(AuthConfig::default()).await
    }

    async fn with_auth(auth: AuthConfig) -> Self {
        let db = TestDatabase::new().await.unwrap();
        let repositories: Arc<dyn RepositoryFactory> = Arc::new(db.factory());
        let services = TenantServices::new(repositories.clone(), Collaborators::default(), BillingConfig::default());
        let seed = SeedContext::new(db.connection.clone(), repositories.clone(), SystemConfig::default()).with_hash_cost(4);
        let initializer = Arc::new(Initializer::from_context(seed));
        let jwt = Arc::new(JwtManager::new(auth));
        let token = jwt.generate_token("admin-user").unwrap();

        let context = ApiContext::new(services, initializer, repositories, jwt).with_reinitialization(true);
        let config = AppConfig {
            enable_tracing: false,
            ..Default::default()
        };
        Self {
            router: create_rest_app(context, config),
            token,
            _db: db,
        }
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>, authorized: bool) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if authorized {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None, false).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body), true).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(body), true).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, None, true).await
    }

    async fn create_tenant(&self, slug: &str) -> Value {
        let (status, body) = self
            .post("/api/v1/tenants", json!({"name": slug.to_uppercase(), "slug": slug}))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["status"], "healthy");

    let (status, _) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_mutations_require_a_token() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(Method::POST, "/api/v1/tenants", Some(json!({"name": "Acme", "slug": "acme"})), false)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);

    let (status, _) = app.get("/api/v1/tenants").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(Method::DELETE, "/api/v1/tenants/acme", None, false)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_reads() {
    let app = TestApp::with_auth(AuthConfig {
        protect_reads: true,
        ..Default::default()
    })
    .await;

    let (status, _) = app.get("/api/v1/tenants").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.call(Method::GET, "/api/v1/tenants", None, true).await;
    assert_eq!(status, StatusCode::OK);

    // health stays open
    let (status, _) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_tenant_lifecycle() {
    let app = TestApp::new().await;
    let tenant = app.create_tenant("acme").await;
    assert_eq!(tenant["created_by"], "admin-user");

    let (status, body) = app.get("/api/v1/tenants/acme").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], tenant["id"]);

    let (status, body) = app.get("/api/v1/tenants?limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["pagination"]["total"], 1);
    assert_eq!(body["meta"]["pagination"]["has_next_page"], false);

    let (status, body) = app.put("/api/v1/tenants/acme", json!({"title": "Acme Inc"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Acme Inc");

    let (status, _) = app.delete("/api/v1/tenants/acme").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get("/api/v1/tenants/acme").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_tenant_validation_and_conflict() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/api/v1/tenants", json!({"name": "", "slug": "ok-slug"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "name");

    let (status, _) = app.post("/api/v1/tenants", json!({"name": "Bad", "slug": "Bad Slug"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/api/v1/tenants", json!({"slug": "missing-name"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.create_tenant("acme").await;
    let (status, body) = app.post("/api/v1/tenants", json!({"name": "Again", "slug": "acme"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
}

#[tokio::test]
async fn test_quota_scenario_over_http() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;

    let (status, _) = app
        .post(
            "/api/v1/tenants/acme/quotas",
            json!({"quota_type": "storage", "max_value": 1000, "unit": "bytes"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post("/api/v1/tenants/acme/quotas/usage", json!({"quota_type": "storage", "delta": 600}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["current_used"], 600);

    let (_, body) = app
        .post("/api/v1/tenants/acme/quotas/check", json!({"quota_type": "storage", "amount": 500}))
        .await;
    assert_eq!(body["data"]["allowed"], false);
    let (_, body) = app
        .post("/api/v1/tenants/acme/quotas/check", json!({"quota_type": "storage", "amount": 300}))
        .await;
    assert_eq!(body["data"]["allowed"], true);

    let (status, body) = app.get("/api/v1/tenants/acme/quotas/usage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["storage"]["remaining"], 400);
}

#[tokio::test]
async fn test_paying_twice_is_a_conflict() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;

    let (status, body) = app
        .post("/api/v1/tenants/acme/billing", json!({"amount": 99.0, "currency": "eur"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["currency"], "EUR");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/tenants/acme/billing/{}/payment", id);
    let (status, body) = app.post(&uri, json!({"payment_method": "card"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "paid");

    let (status, body) = app.post(&uri, json!({"payment_method": "card"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (_, body) = app.get("/api/v1/tenants/acme/billing/summary").await;
    assert_eq!(body["data"]["paid_count"], 1);
}

#[tokio::test]
async fn test_cancelled_billing_stays_cancelled() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;

    let (_, body) = app.post("/api/v1/tenants/acme/billing", json!({"amount": 15.0})).await;
    let uri = format!("/api/v1/tenants/acme/billing/{}", body["data"]["id"].as_str().unwrap());

    let (status, _) = app.put(&uri, json!({"status": "paid"})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.put(&uri, json!({"status": "cancelled"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");

    let (status, body) = app.put(&uri, json!({"status": "pending"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (status, _) = app.post(&format!("{}/payment", uri), json!({"payment_method": "card"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_overdue_sweep_endpoint() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;

    let past_due = (chrono::Utc::now() - chrono::Duration::days(3)).to_rfc3339();
    app.post("/api/v1/tenants/acme/billing", json!({"amount": 10.0, "due_date": past_due}))
        .await;

    let (_, body) = app.get("/api/v1/tenants/acme/billing?status=overdue").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, body) = app.post("/api/v1/billing/overdue", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updated"], 1);

    let (_, body) = app.get("/api/v1/tenants/acme/billing?status=overdue").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["days_overdue"], 3);
}

#[tokio::test]
async fn test_readonly_setting_is_forbidden() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;

    let (status, _) = app
        .post(
            "/api/v1/tenants/acme/settings",
            json!({"setting_key": "plan", "setting_value": "gold", "is_readonly": true, "is_public": true}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .put("/api/v1/tenants/acme/settings/plan/value", json!({"value": "free"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 403);

    let (_, body) = app.get("/api/v1/tenants/acme/settings/public").await;
    assert_eq!(body["data"]["plan"], "gold");

    let (status, body) = app
        .put("/api/v1/tenants/acme/settings/max_users/value", json!({"value": 25}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["parsed_value"], 25);
}

#[tokio::test]
async fn test_relation_routes() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;

    let (status, _) = app.post("/api/v1/tenants/acme/groups", json!({"target_id": "g1"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.post("/api/v1/tenants/acme/groups", json!({"target_id": "g1"})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get("/api/v1/tenants/acme/groups").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["target_name"], "Group g1");

    let (_, body) = app.get("/api/v1/tenants/acme/menus").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, _) = app.get("/api/v1/tenants/acme/widgets").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete("/api/v1/tenants/acme/groups/g1").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/v1/tenants/acme/groups/g1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_members_and_roles() {
    let app = TestApp::new().await;
    let tenant = app.create_tenant("acme").await;

    let (status, body) = app.post("/api/v1/tenants/acme/users/u1/roles", json!({"role_id": "r1"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "user_id");

    let (status, _) = app.post("/api/v1/tenants/acme/users", json!({"user_id": "u1"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.post("/api/v1/tenants/acme/users/u1/roles", json!({"role_id": "r1"})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get("/api/v1/tenants/acme/users/u1/roles").await;
    assert_eq!(body["data"], json!(["r1"]));

    let (_, body) = app.get("/api/v1/users/u1/tenant").await;
    assert_eq!(body["data"]["id"], tenant["id"]);

    let (status, _) = app.delete("/api/v1/tenants/acme/users/u1").await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/v1/tenants/acme/users/u1/roles").await;
    assert_eq!(body["data"], json!([]));
    let (status, _) = app.get("/api/v1/users/u1/tenant").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_system_initialization() {
    let app = TestApp::new().await;

    let (_, body) = app.get("/api/v1/sys/status").await;
    assert_eq!(body["data"]["initialized"], false);

    let (status, body) = app.post("/api/v1/sys/initialize", json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["steps"].as_array().unwrap().len(), 7);

    let (status, body) = app.post("/api/v1/sys/initialize", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (status, body) = app
        .post("/api/v1/sys/initialize", json!({"allow_reinitialization": true}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["steps"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["outcome"] == "skipped"));

    let (_, body) = app.get("/api/v1/tenants/ncobase").await;
    assert_eq!(body["data"]["slug"], "ncobase");
}

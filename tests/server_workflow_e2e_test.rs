//! End-to-end workflow against a running ncobase server
//!
//! Boots the real server wiring on a random port over a temporary SQLite
//! database, seeds it, then drives it over HTTP:
//! 1. Health and initialization status
//! 2. The seeded default tenant, its groups and members
//! 3. Tenant creation, quota enforcement and billing through the overdue sweep
//! 4. Bearer token enforcement on mutating routes

use anyhow::Result;
use ncobase_config::{CacheBackend, NcobaseConfig};
use ncobase_rest_api::JwtManager;
use ncobase_server::Server;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tempfile::TempDir;
use tokio::net::TcpListener;

struct ServerTestContext {
    addr: SocketAddr,
    client: Client,
    token: String,
    _temp_dir: TempDir,
}

impl ServerTestContext {
    async fn start() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;

        let mut config = NcobaseConfig::default();
        config.database.url = format!("sqlite://{}?mode=rwc", temp_dir.path().join("e2e.db").display());
        config.cache.backend = CacheBackend::Moka;
        config.cache.invalidation_mode = "sync".to_string();

        let token = JwtManager::new(config.auth.clone()).generate_token("super")?;

        let server = Server::new(config).await?;
        server.initialize().await?;
        let app = server.build_app();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            client: Client::new(),
            token,
            _temp_dir: temp_dir,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        let response = self.client.get(self.url(path)).bearer_auth(&self.token).send().await?;
        Ok((response.status(), response.json().await?))
    }

    async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Ok((response.status(), response.json().await?))
    }
}

#[tokio::test]
async fn test_seeded_server_serves_default_tenant() -> Result<()> {
    let ctx = ServerTestContext::start().await?;

    let response = ctx.client.get(ctx.url("/health")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = ctx.get("/api/v1/sys/status").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["initialized"], true);

    let (status, body) = ctx.get("/api/v1/tenants/ncobase").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["slug"], "ncobase");

    let (_, body) = ctx.get("/api/v1/tenants/ncobase/groups").await?;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|g| g["target_name"].as_str())
        .collect();
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"Headquarters"));

    let (_, body) = ctx.get("/api/v1/tenants/ncobase/users").await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    // a second run is refused without the reinitialization flag
    let (status, _) = ctx.post("/api/v1/sys/initialize", json!({})).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn test_tenant_quota_and_billing_workflow() -> Result<()> {
    let ctx = ServerTestContext::start().await?;

    let (status, body) = ctx
        .post("/api/v1/tenants", json!({"name": "Acme", "slug": "acme"}))
        .await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, _) = ctx
        .post(
            "/api/v1/tenants/acme/quotas",
            json!({"quota_type": "users", "max_value": 10, "unit": "count"}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = ctx
        .post("/api/v1/tenants/acme/quotas/usage", json!({"quota_type": "users", "delta": 8}))
        .await?;
    assert_eq!(body["data"]["current_used"], 8);

    let (_, body) = ctx
        .post("/api/v1/tenants/acme/quotas/check", json!({"quota_type": "users", "amount": 5}))
        .await?;
    assert_eq!(body["data"]["allowed"], false);

    // usage never drops below zero
    let (_, body) = ctx
        .post("/api/v1/tenants/acme/quotas/usage", json!({"quota_type": "users", "delta": -20}))
        .await?;
    assert_eq!(body["data"]["current_used"], 0);

    let (_, body) = ctx
        .post("/api/v1/tenants/acme/quotas/check", json!({"quota_type": "users", "amount": 5}))
        .await?;
    assert_eq!(body["data"]["allowed"], true);

    let (status, body) = ctx
        .post(
            "/api/v1/tenants/acme/billing",
            json!({"amount": 50.0, "due_date": "2020-01-01T00:00:00Z"}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["is_overdue"], true);

    let (status, body) = ctx.post("/api/v1/billing/overdue", json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updated"], 1);

    let (_, body) = ctx.get("/api/v1/tenants/acme/billing/summary").await?;
    assert_eq!(body["data"]["overdue_count"], 1);
    assert_eq!(body["data"]["outstanding_amount"], 50.0);

    Ok(())
}

#[tokio::test]
async fn test_mutations_without_token_are_rejected() -> Result<()> {
    let ctx = ServerTestContext::start().await?;

    let response = ctx
        .client
        .post(ctx.url("/api/v1/tenants"))
        .json(&json!({"name": "Nope", "slug": "nope"}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["code"], 401);

    let response = ctx
        .client
        .delete(ctx.url("/api/v1/tenants/ncobase"))
        .bearer_auth("not-a-token")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

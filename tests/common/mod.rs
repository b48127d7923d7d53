#![allow(dead_code)]

use std::sync::{Arc, Once};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use devconnector_api::config::AppConfig;
use devconnector_api::database::{MemoryStore, ProfileStore, UserStore};
use devconnector_api::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const AUTH_HEADER: &str = "x-auth-token";

static TRACING: Once = Once::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register an account and return its token
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/users"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "register failed: {}", res.status());
        token_from(res).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/auth"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        token_from(res).await
    }

    /// Create or update the caller's profile, returning the stored document
    pub async fn save_profile(&self, token: &str, body: Value) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/api/profile"))
            .header(AUTH_HEADER, token)
            .json(&body)
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "profile save failed: {}", res.status());
        Ok(res.json().await?)
    }
}

async fn token_from(res: reqwest::Response) -> Result<String> {
    let body = res.json::<Value>().await?;
    body["token"]
        .as_str()
        .map(str::to_string)
        .context("response has no token")
}

/// Serve the app on a free port backed by an in-memory store
pub async fn spawn_app() -> Result<TestServer> {
    spawn_with(AppConfig::for_tests(TEST_SECRET)).await
}

pub async fn spawn_with(config: AppConfig) -> Result<TestServer> {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });

    let store = Arc::new(MemoryStore::new());
    let users: Arc<dyn UserStore> = store.clone();
    let profiles: Arc<dyn ProfileStore> = store;
    let state = AppState::new(config, users, profiles)?;

    serve(app(state)).await
}

/// Serve any router on a free port; used for the app and for upstream mocks
pub async fn serve(router: axum::Router) -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    // Bound before spawning, so requests queue instead of being refused
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test port")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        port,
        base_url,
        client: reqwest::Client::new(),
    })
}

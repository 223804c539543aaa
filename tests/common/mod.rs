use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};

use roster_api::auth::{self, Claims};
use roster_api::config::AppConfig;
use roster_api::routes;
use roster_api::state::AppState;
use roster_api::store::memory::MemoryStore;

pub const LOGIN_EMAIL: &str = "bernard@dot.com";
pub const LOGIN_PASSWORD: &str = "scummbar";

/// One test server: the full router on an ephemeral port with a fresh
/// in-memory store. Each test gets its own, so record state never leaks
/// between tests.
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    config: AppConfig,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// A token the server's authentication stage accepts.
    pub fn valid_token(&self) -> String {
        let claims = Claims::new(LOGIN_EMAIL, 1);
        auth::sign(&self.config.security, &claims).expect("sign test token")
    }

    /// A token signed with a different secret.
    pub fn forged_token(&self) -> String {
        let mut security = self.config.security.clone();
        security.jwt_secret = "not-the-server-secret".to_string();
        auth::sign(&security, &Claims::new(LOGIN_EMAIL, 1)).expect("sign forged token")
    }

    /// A correctly signed token whose expiry is far enough in the past to
    /// clear the verifier's 60s leeway.
    pub fn expired_token(&self) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: LOGIN_EMAIL.to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        auth::sign(&self.config.security, &claims).expect("sign expired token")
    }
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::defaults();
    config.security.jwt_secret = "integration-test-secret".to_string();
    config.security.login_email = LOGIN_EMAIL.to_string();
    config.security.login_password = LOGIN_PASSWORD.to_string();
    config
}

pub async fn spawn() -> Result<TestServer> {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let app = routes::app(AppState::new(config.clone(), store.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind test listener")?;
    let addr = listener.local_addr().context("test listener addr")?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        store,
        config,
    })
}

/// POST /users with a well-formed body, returning the created record.
pub async fn create_user(
    server: &TestServer,
    client: &reqwest::Client,
    email: &str,
) -> Result<serde_json::Value> {
    let res = client
        .post(server.url("/users"))
        .json(&serde_json::json!({
            "email": email,
            "firstName": "Bernard",
            "lastName": "Bernoulli"
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status().is_success(),
        "create_user failed with {}",
        res.status()
    );
    Ok(res.json().await?)
}

/// Map of `field path -> message` from a validation error body.
pub fn field_errors(body: &serde_json::Value) -> HashMap<String, String> {
    body["field_errors"]
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(k, v)| (k.clone(), v.as_str().unwrap_or_default().to_string()))
                .collect()
        })
        .unwrap_or_default()
}

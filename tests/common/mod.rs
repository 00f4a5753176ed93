#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;

use studio_api::auth::password::hash_password_with_cost;
use studio_api::auth::{AdminIdentity, TokenService};
use studio_api::database::{AdminRepository, DatabaseManager};

/// Secret the spawned server signs with, so tests can mint their own tokens.
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub upload_dir: std::path::PathBuf,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let upload_dir = std::env::temp_dir().join(format!("studio-it-uploads-{}", port));

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_studio-api"));
        cmd.env("APP_ENV", "development")
            .env("HOST", "127.0.0.1")
            .env("STUDIO_API_PORT", port.to_string())
            .env("JWT_SECRET", TEST_JWT_SECRET)
            .env("DATABASE_CONNECTION_TIMEOUT", "3")
            .env("ADMIN_UI_DIR", "/nonexistent/studio-admin-ui")
            .env("UPLOAD_BACKEND", "local")
            .env("UPLOAD_DIR", &upload_dir)
            .env("UPLOAD_PUBLIC_BASE_URL", "/uploads")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // DATABASE_URL is inherited from the environment (or .env, loaded by the server)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            upload_dir,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = client.get(format!("{}/health", self.base_url)).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let _ = dotenvy::dotenv();
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(20)).await?;
    Ok(server)
}

/// Client that never follows redirects, so guard responses can be inspected.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client builds")
}

/// True when the spawned server reports a working database. Scenarios that
/// need one return early otherwise.
pub async fn database_available(server: &TestServer) -> Result<bool> {
    let status = client().get(server.url("/health")).send().await?.status();
    if status != StatusCode::OK {
        eprintln!("skipping: database unavailable");
    }
    Ok(status == StatusCode::OK)
}

/// Direct pool for seeding and assertions, using the same settings as the server.
pub async fn seed_pool() -> Result<PgPool> {
    let _ = dotenvy::dotenv();
    let pool = DatabaseManager::connect(&studio_api::config::config().database).await?;
    Ok(pool)
}

pub fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}_{}_{}", prefix, std::process::id(), nanos)
}

/// Insert an admin with a cheap bcrypt hash; returns (id, username).
pub async fn seed_admin(pool: &PgPool, password: &str) -> Result<(i64, String)> {
    let username = unique("it_admin");
    let hash = hash_password_with_cost(password, 4).await?;
    let admin = AdminRepository::new(pool.clone())
        .create(&username, &hash, "Integration Admin")
        .await?;
    Ok((admin.id, username))
}

/// A token the server accepts without a database round trip.
pub fn minted_token() -> String {
    TokenService::new(TEST_JWT_SECRET, chrono::Duration::hours(1))
        .issue(&AdminIdentity {
            id: 1,
            username: "integration".to_string(),
            name: "Integration".to_string(),
        })
        .expect("token signs")
}

/// Seed an admin, log in through the API and return the issued token.
pub async fn admin_token(server: &TestServer, pool: &PgPool) -> Result<String> {
    let password = "correct horse battery staple";
    let (_, username) = seed_admin(pool, password).await?;
    let body: Value = client()
        .post(server.url("/api/admin/auth/login"))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await?
        .json()
        .await?;
    body["token"]
        .as_str()
        .map(str::to_string)
        .with_context(|| format!("login returned no token: {}", body))
}

/// Create a category through the admin API and return its id.
pub async fn create_category(server: &TestServer, token: &str) -> Result<i64> {
    let body: Value = client()
        .post(server.url("/api/admin/categories"))
        .bearer_auth(token)
        .json(&json!({ "name": unique("category") }))
        .send()
        .await?
        .json()
        .await?;
    body["data"]["id"]
        .as_i64()
        .with_context(|| format!("category create failed: {}", body))
}

/// Create a work through the admin API and return its id.
pub async fn create_work(server: &TestServer, token: &str, category_id: i64, event_date: &str) -> Result<i64> {
    let body: Value = client()
        .post(server.url("/api/admin/works"))
        .bearer_auth(token)
        .json(&json!({
            "title": unique("work"),
            "categoryId": category_id,
            "eventDate": event_date,
            "contentImages": ["/uploads/content/a.png", "/uploads/content/b.png"]
        }))
        .send()
        .await?
        .json()
        .await?;
    body["data"]["id"]
        .as_i64()
        .with_context(|| format!("work create failed: {}", body))
}

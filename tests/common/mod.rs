use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/memory-lane-api");
        cmd.env("MEMORY_LANE_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

/// Spawns the server once per test binary. Returns None when DATABASE_URL
/// is not set so the suite can pass on machines without Postgres.
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    if std::env::var("DATABASE_URL").is_err() && !std::path::Path::new(".env").exists() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(None);
    }

    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(Some(server))
}

/// Fresh email per call so repeated runs never collide on the unique index.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, uuid::Uuid::new_v4().simple())
}

/// Registers a user and returns (token, user json).
pub async fn register_user(base_url: &str, prefix: &str) -> Result<(String, Value)> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&serde_json::json!({
            "email": unique_email(prefix),
            "name": "Test User",
            "password": "Password1",
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "register failed: {}",
        res.status()
    );
    let body: Value = res.json().await?;
    let token = body["data"]["token"]
        .as_str()
        .context("missing token")?
        .to_string();
    Ok((token, body["data"]["user"].clone()))
}

/// Creates a lane owned by `token`, returning its json.
pub async fn create_lane(base_url: &str, token: &str, title: &str) -> Result<Value> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/lanes", base_url))
        .bearer_auth(token)
        .json(&serde_json::json!({ "title": title }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "lane create failed: {}",
        res.status()
    );
    let body: Value = res.json().await?;
    Ok(body["data"].clone())
}

#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();
static USER_SEQ: AtomicU32 = AtomicU32::new(0);

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // In-memory stores keep the suite independent of a running PostgreSQL
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_superlists-api"));
        cmd.arg("--in-memory")
            .env("API_PORT", port.to_string())
            .env("JWT_SECRET", "integration-test-secret")
            .env("PASSWORD_HASH_COST", "4")
            .env("API_ENABLE_REQUEST_LOGGING", "false")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/ping", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
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
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Sign up a fresh user and return a bearer token for it
pub async fn signed_in_user(server: &TestServer, client: &reqwest::Client) -> Result<String> {
    let n = USER_SEQ.fetch_add(1, Ordering::SeqCst);
    let email = format!("user{}-{}@example.com", std::process::id(), n);

    let res = client
        .post(server.url("/v1/auth/signup"))
        .json(&json!({ "name": format!("user {}", n), "email": email, "password": "secret-pw" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "signup failed: {}", res.status());

    let res = client
        .post(server.url("/v1/auth/login"))
        .json(&json!({ "email": email, "password": "secret-pw" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

    let body = res.json::<Value>().await?;
    body["data"]["token"]
        .as_str()
        .map(str::to_string)
        .context("login response carried no token")
}

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub const JWT_SECRET: &str = "integration-secret";

pub struct TestServer {
    pub base_url: String,
    _child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_book-api"));
        cmd.env("BOOK_API_PORT", port.to_string())
            .env("HOST", "127.0.0.1")
            .env("JWT_SECRET", JWT_SECRET)
            .env("DATABASE_RUN_MIGRATIONS", "true")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // DATABASE_URL is inherited from the test environment
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, _child: child })
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
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Returns None when no database is configured for integration runs
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return Ok(None);
    }
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(Some(server))
}

pub fn admin_token() -> Result<String> {
    let claims = book_api::auth::Claims::new("integration", "admin", 1);
    Ok(book_api::auth::generate_jwt(&claims, JWT_SECRET)?)
}

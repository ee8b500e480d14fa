//! HTTP integration tests.
//!
//! These tests start the compiled server binary against a scratch config
//! bound to an ephemeral port, then drive it over real HTTP with reqwest.
//! Tests share one server instance since the service is stateless and
//! supports concurrent requests.

use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::Duration;

use tempfile::TempDir;

/// Global server process manager
static SERVER: OnceLock<ServerManager> = OnceLock::new();

/// Manages the server process lifecycle for the test run.
struct ServerManager {
    process: Child,
    port: u16,
    // Held so the config file outlives the server process
    _config_dir: TempDir,
}

impl ServerManager {
    fn init() -> Self {
        let port = free_port();

        let config_dir = tempfile::tempdir().expect("Failed to create temp config dir");
        let config_path = config_dir.path().join("greeter.toml");
        let mut config_file =
            std::fs::File::create(&config_path).expect("Failed to create config file");
        write!(
            config_file,
            "[http]\nhost = \"127.0.0.1\"\nport = {port}\n"
        )
        .expect("Failed to write config file");

        eprintln!("[test] Starting server on port {port}...");
        let process = Command::new(env!("CARGO_BIN_EXE_greeter"))
            .arg("--config")
            .arg(&config_path)
            .arg("--log-level")
            .arg("greeter=info")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to start server binary");

        let manager = Self {
            process,
            port,
            _config_dir: config_dir,
        };
        manager.wait_for_ready();
        manager
    }

    fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Wait for the server to accept TCP connections.
    fn wait_for_ready(&self) {
        let max_attempts = 50;
        let delay = Duration::from_millis(100);

        for attempt in 0..max_attempts {
            if TcpStream::connect(("127.0.0.1", self.port)).is_ok() {
                eprintln!("[test] Server ready after {} attempts", attempt + 1);
                return;
            }
            std::thread::sleep(delay);
        }

        panic!(
            "Server did not start within {} seconds",
            max_attempts as f64 * delay.as_secs_f64()
        );
    }
}

impl Drop for ServerManager {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Bind to port 0 to let the OS pick a free port, then release it.
fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind ephemeral port");
    listener
        .local_addr()
        .expect("Failed to read ephemeral port")
        .port()
}

fn server() -> &'static ServerManager {
    SERVER.get_or_init(ServerManager::init)
}

/// The greeting body this machine should produce: the real hostname when it
/// resolves, the placeholder otherwise.
fn expected_greeting() -> String {
    let name = hostname::get()
        .ok()
        .and_then(|raw| raw.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    format!("<h1>Hello from Java multi-stage build! 🚀</h1><p>Container hostname: {name}</p>")
}

#[tokio::test]
async fn health_returns_200_ok() {
    let url = format!("{}/health", server().base_url());
    let response = reqwest::get(&url).await.expect("GET /health failed");

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn root_returns_greeting_with_hostname() {
    let url = server().base_url();
    let response = reqwest::get(&url).await.expect("GET / failed");

    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    assert_eq!(response.text().await.unwrap(), expected_greeting());
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let url = server().base_url();

    let first = reqwest::get(&url).await.unwrap().text().await.unwrap();
    for _ in 0..5 {
        let body = reqwest::get(&url).await.unwrap().text().await.unwrap();
        assert_eq!(body, first);
    }
}

#[tokio::test]
async fn concurrent_requests_get_independent_responses() {
    let base = server().base_url();
    let client = reqwest::Client::new();
    let expected = expected_greeting();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..16 {
        let client = client.clone();
        let url = if i % 2 == 0 {
            base.clone()
        } else {
            format!("{base}/health")
        };
        tasks.spawn(async move {
            let response = client.get(&url).send().await.expect("request failed");
            (i, response.status().as_u16(), response.text().await.unwrap())
        });
    }

    while let Some(result) = tasks.join_next().await {
        let (i, status, body) = result.expect("task panicked");
        assert_eq!(status, 200);
        if i % 2 == 0 {
            assert_eq!(body, expected);
        } else {
            assert_eq!(body, "OK");
        }
    }
}

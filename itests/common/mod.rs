#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tokio::time::sleep;

pub mod port_leaser;
pub use port_leaser::{PortLease, TestPortAllocator};

pub const TEST_USER: &str = "testy";
pub const TEST_PASSWORD: &str = "testy";
pub const TEST_CONTENT: &str = "this is a test\n{\"hello\":5,\"test\":6}";

/// A real vantage-server process serving a scratch home directory
pub struct TestServer {
    child: Child,
    base_url: String,
    home: tempfile::TempDir,
    _port_lease: PortLease,
}

impl TestServer {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        Self::start_with_env(&[]).await
    }

    /// Start the server with extra environment variables on an auto-leased port
    pub async fn start_with_env(
        env: &[(&str, &str)],
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let home = tempfile::tempdir()?;
        let port_lease = TestPortAllocator::instance().lease_port()?;
        let port = port_lease.port();

        let mut command = Command::new(env!("CARGO_BIN_EXE_vantage-server"));
        command
            .arg("start")
            .arg("--ip")
            .arg("127.0.0.1")
            .arg("--port")
            .arg(port.to_string())
            .env("VANTAGE_HOME", home.path())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        for (key, value) in env {
            command.env(key, value);
        }
        let mut child = command.spawn()?;

        let client = reqwest::Client::new();
        let base_url = format!("http://127.0.0.1:{}", port);
        for _ in 0..500 {
            if let Some(status) = child.try_wait()? {
                return Err(format!("Server process exited early with status: {}", status).into());
            }
            if let Ok(response) = client.get(format!("{}/version", base_url)).send().await {
                if response.status().is_success() {
                    return Ok(TestServer {
                        child,
                        base_url,
                        home,
                        _port_lease: port_lease,
                    });
                }
            }
            sleep(Duration::from_millis(10)).await;
        }

        let _ = child.kill();
        Err("Server failed to start".into())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    pub fn client_results_dir(&self, username: &str) -> PathBuf {
        self.home().join("results").join(username)
    }

    pub fn client_experiments_dir(&self, username: &str) -> PathBuf {
        self.home().join("experiments").join(username)
    }

    pub fn client_logs_dir(&self, username: &str) -> PathBuf {
        self.home().join("logs").join(username)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client")
}

pub async fn register(
    server: &TestServer,
    client: &reqwest::Client,
    username: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(server.url("/register"))
        .json(&serde_json::json!({"username": username, "password": password}))
        .send()
        .await
        .expect("Failed to send register request")
}

/// Server with the `testy` account already registered
pub async fn start_with_test_user() -> (TestServer, reqwest::Client) {
    let server = TestServer::start().await.expect("Failed to start test server");
    let client = http_client();
    let response = register(&server, &client, TEST_USER, TEST_PASSWORD).await;
    assert!(response.status().is_success(), "register failed: {}", response.status());
    (server, client)
}

pub fn file_form(field: &str, filename: &str, content: &[u8]) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(content.to_vec()).file_name(filename.to_string());
    reqwest::multipart::Form::new().part(field.to_string(), part)
}

use crate::common::{self, TestServer, TEST_PASSWORD, TEST_USER};

#[tokio::test]
async fn test_not_found() {
    let (server, client) = common::start_with_test_user().await;

    let response = client
        .get(server.url("/this-is-not/a-real-url"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    // Credentials do not change the answer
    let response = client
        .get(server.url("/this-is-not/a-real-url"))
        .basic_auth(TEST_USER, Some(TEST_PASSWORD))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unauthorized() {
    let server = TestServer::start().await.expect("Failed to start test server");
    let client = common::http_client();

    let response = client
        .get(server.url("/results"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_request_line_is_rejected() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let server = TestServer::start().await.expect("Failed to start test server");
    let addr = server.base_url().trim_start_matches("http://").to_string();

    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("Failed to connect");
    stream
        .write_all(b"asdlfkjas;dlfjas;dlfjsa;dlfj;ladskfj\r\n\r\n")
        .await
        .expect("Failed to write");

    let mut received = Vec::new();
    let _ = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        stream.read_to_end(&mut received),
    )
    .await;
    let received = String::from_utf8_lossy(&received);
    assert!(
        received.starts_with("HTTP/1.1 400"),
        "unexpected response: {received:?}"
    );
}

#[tokio::test]
async fn test_recommended_version() {
    let version = "1.2.3.4.5.6.7.8.9";
    let server = TestServer::start_with_env(&[("VANTAGE_RECOMMENDED_VERSION", version)])
        .await
        .expect("Failed to start test server");
    let client = common::http_client();

    let response = client
        .get(server.url("/version"))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let content: serde_json::Value = response.json().await.expect("Failed to parse body");
    assert_eq!(content["version"], version);
}

#[tokio::test]
async fn test_recommended_version_from_config_file() {
    // A home directory with a config file is picked up at startup
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        "recommended_version = \"7.7.7\"\n",
    )
    .unwrap();
    let home_str = home.path().to_string_lossy().to_string();
    let server = TestServer::start_with_env(&[("VANTAGE_HOME", home_str.as_str())])
        .await
        .expect("Failed to start test server");

    let content: serde_json::Value = common::http_client()
        .get(server.url("/version"))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse body");
    assert_eq!(content["version"], "7.7.7");
}

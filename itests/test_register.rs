use crate::common::{self, TestServer, TEST_PASSWORD, TEST_USER};

#[tokio::test]
async fn test_register_then_authenticated_request() {
    let server = TestServer::start().await.expect("Failed to start test server");
    let client = common::http_client();

    let response = common::register(&server, &client, "fresh-client", "s3cret").await;
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let response = client
        .get(server.url("/results"))
        .basic_auth("fresh-client", Some("s3cret"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    for dir in [
        server.client_results_dir("fresh-client"),
        server.client_experiments_dir("fresh-client"),
        server.client_logs_dir("fresh-client"),
    ] {
        assert!(dir.is_dir(), "{dir:?} should exist after registration");
    }
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let (server, client) = common::start_with_test_user().await;

    let response = common::register(&server, &client, TEST_USER, "another-password").await;
    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);
    let body: serde_json::Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["status_message"], "conflict");

    // The first registration still holds
    let response = client
        .get(server.url("/results"))
        .basic_auth(TEST_USER, Some(TEST_PASSWORD))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let (server, client) = common::start_with_test_user().await;

    let response = client
        .get(server.url("/results"))
        .basic_auth(TEST_USER, Some("not-the-password"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_malformed_payload() {
    let server = TestServer::start().await.expect("Failed to start test server");
    let client = common::http_client();

    let response = client
        .post(server.url("/register"))
        .header("content-type", "application/json")
        .body("{\"username\": ")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

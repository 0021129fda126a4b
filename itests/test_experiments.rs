use crate::common::{self, TEST_PASSWORD, TEST_USER};

#[tokio::test]
async fn test_experiments_are_listed_and_downloadable() {
    let (server, client) = common::start_with_test_user().await;
    std::fs::write(
        server.client_experiments_dir(TEST_USER).join("baseline.json"),
        "{\"urls\": [\"http://example.com\"]}",
    )
    .unwrap();

    let listing: serde_json::Value = client
        .get(server.url("/experiments"))
        .basic_auth(TEST_USER, Some(TEST_PASSWORD))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse body");
    assert_eq!(listing["experiments"], serde_json::json!(["baseline.json"]));

    let response = client
        .get(server.url("/experiments/baseline.json"))
        .basic_auth(TEST_USER, Some(TEST_PASSWORD))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert_eq!(body, "{\"urls\": [\"http://example.com\"]}");
}

#[tokio::test]
async fn test_unknown_experiment_is_not_found() {
    let (server, client) = common::start_with_test_user().await;

    let response = client
        .get(server.url("/experiments/missing.json"))
        .basic_auth(TEST_USER, Some(TEST_PASSWORD))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

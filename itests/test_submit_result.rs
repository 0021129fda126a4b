use crate::common::{self, TEST_CONTENT, TEST_PASSWORD, TEST_USER};

#[tokio::test]
async fn test_submit_result() {
    let (server, client) = common::start_with_test_user().await;

    let filename = "tmp5p8yzq3w";
    let response = client
        .post(server.url("/"))
        .basic_auth(TEST_USER, Some(TEST_PASSWORD))
        .multipart(common::file_form("result", filename, TEST_CONTENT.as_bytes()))
        .send()
        .await
        .expect("Failed to send upload");
    assert!(response.status().is_success(), "upload failed: {}", response.status());

    let res_file = server.client_results_dir(TEST_USER).join(filename);
    assert!(res_file.exists());
    assert_eq!(std::fs::read_to_string(res_file).unwrap(), TEST_CONTENT);
}

#[tokio::test]
async fn test_submit_result_twice_overwrites() {
    let (server, client) = common::start_with_test_user().await;

    for content in [TEST_CONTENT, "second upload"] {
        let response = client
            .post(server.url("/results"))
            .basic_auth(TEST_USER, Some(TEST_PASSWORD))
            .multipart(common::file_form("result", "result.json", content.as_bytes()))
            .send()
            .await
            .expect("Failed to send upload");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    }

    let results_dir = server.client_results_dir(TEST_USER);
    let entries: Vec<_> = std::fs::read_dir(&results_dir).unwrap().collect();
    assert_eq!(entries.len(), 1, "no second file should be created");
    assert_eq!(
        std::fs::read_to_string(results_dir.join("result.json")).unwrap(),
        "second upload"
    );

    let listing: serde_json::Value = client
        .get(server.url("/results"))
        .basic_auth(TEST_USER, Some(TEST_PASSWORD))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse body");
    assert_eq!(listing["results"], serde_json::json!(["result.json"]));
}

#[tokio::test]
async fn test_submit_binary_result_is_byte_exact() {
    let (server, client) = common::start_with_test_user().await;

    let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let response = client
        .post(server.url("/"))
        .basic_auth(TEST_USER, Some(TEST_PASSWORD))
        .multipart(common::file_form("result", "capture.pcap", &content))
        .send()
        .await
        .expect("Failed to send upload");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let stored = std::fs::read(server.client_results_dir(TEST_USER).join("capture.pcap")).unwrap();
    assert_eq!(stored, content);
}

#[tokio::test]
async fn test_submit_result_cannot_escape_account() {
    let (server, client) = common::start_with_test_user().await;
    let other = common::register(&server, &client, "other", "other").await;
    assert!(other.status().is_success());

    // Send the name as is, without percent encoding the separators
    let part = reqwest::multipart::Part::bytes(b"{}".to_vec()).file_name("../other/planted.json");
    let form = reqwest::multipart::Form::new()
        .percent_encode_noop()
        .part("result", part);
    let response = client
        .post(server.url("/"))
        .basic_auth(TEST_USER, Some(TEST_PASSWORD))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send upload");
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    assert!(std::fs::read_dir(server.client_results_dir("other"))
        .unwrap()
        .next()
        .is_none());
    assert!(std::fs::read_dir(server.client_results_dir(TEST_USER))
        .unwrap()
        .next()
        .is_none());
}

#[tokio::test]
async fn test_submit_result_with_dotted_name_is_listed() {
    let (server, client) = common::start_with_test_user().await;

    let response = client
        .post(server.url("/results"))
        .basic_auth(TEST_USER, Some(TEST_PASSWORD))
        .multipart(common::file_form("result", ".tmp-results.json", b"{}"))
        .send()
        .await
        .expect("Failed to send upload");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let listing: serde_json::Value = client
        .get(server.url("/results"))
        .basic_auth(TEST_USER, Some(TEST_PASSWORD))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse body");
    assert_eq!(listing["results"], serde_json::json!([".tmp-results.json"]));
}

#[tokio::test]
async fn test_submit_result_without_credentials() {
    let (server, client) = common::start_with_test_user().await;

    let response = client
        .post(server.url("/"))
        .multipart(common::file_form("result", "anon.json", b"{}"))
        .send()
        .await
        .expect("Failed to send upload");
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_submit_log() {
    let (server, client) = common::start_with_test_user().await;

    let response = client
        .post(server.url("/logs"))
        .basic_auth(TEST_USER, Some(TEST_PASSWORD))
        .multipart(common::file_form("log", "client.log", b"probe finished\n"))
        .send()
        .await
        .expect("Failed to send upload");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let stored = std::fs::read(server.client_logs_dir(TEST_USER).join("client.log")).unwrap();
    assert_eq!(stored, b"probe finished\n");
}

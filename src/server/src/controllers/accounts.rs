use actix_web::{web, HttpRequest, HttpResponse};

use libvantage::error::VantageError;
use libvantage::repositories;
use libvantage::view::{RegisterResponse, StatusMessage};

use crate::app_data::app_data;
use crate::params::RegisterBody;

/// `POST /register`: 201 on success, 409 if the username is taken
pub async fn register(
    req: HttpRequest,
    body: web::Json<RegisterBody>,
) -> Result<HttpResponse, VantageError> {
    let app_data = app_data(&req)?.clone();
    let RegisterBody { username, password } = body.into_inner();

    let account = web::block(move || {
        repositories::accounts::register(
            &app_data.accounts,
            &app_data.layout,
            &username,
            &password,
        )
    })
    .await??;

    Ok(HttpResponse::Created().json(RegisterResponse {
        status: StatusMessage::resource_created(),
        username: account.username,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    use libvantage::view::{ErrorResponse, RegisterResponse, MSG_BAD_REQUEST, MSG_CONFLICT};

    use crate::server;
    use crate::test as helpers;

    #[actix_web::test]
    async fn test_register_then_authenticated_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(server::app(helpers::app_data(dir.path()))).await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"username": "testy", "password": "testy"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: RegisterResponse = test::read_body_json(resp).await;
        assert_eq!(body.username, "testy");

        let req = test::TestRequest::get()
            .uri("/results")
            .insert_header(helpers::basic_auth("testy", "testy"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(dir.path().join("results").join("testy").is_dir());
    }

    #[actix_web::test]
    async fn test_register_duplicate_is_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(server::app(helpers::app_data(dir.path()))).await;

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let req = test::TestRequest::post()
                .uri("/register")
                .set_json(json!({"username": "testy", "password": "testy"}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
            if expected == StatusCode::CONFLICT {
                let body: ErrorResponse = test::read_body_json(resp).await;
                assert_eq!(body.status_message, MSG_CONFLICT);
            }
        }
    }

    #[actix_web::test]
    async fn test_register_missing_field_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(server::app(helpers::app_data(dir.path()))).await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"username": "testy"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.status_message, MSG_BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_register_garbage_body_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(server::app(helpers::app_data(dir.path()))).await;

        let req = test::TestRequest::post()
            .uri("/register")
            .insert_header(("content-type", "application/json"))
            .set_payload("asdlfkjas;dlfjas;dlfjsa;dlfj;ladskfj")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_register_invalid_username_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(server::app(helpers::app_data(dir.path()))).await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"username": "../../etc", "password": "pw"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(!dir.path().join("etc").exists());
    }
}

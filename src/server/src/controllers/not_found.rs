use actix_web::HttpRequest;

use libvantage::error::VantageError;

/// Fallback for every path no route matched
pub async fn index(req: HttpRequest) -> Result<&'static str, VantageError> {
    log::debug!("no route for {} {}", req.method(), req.path());
    Err(VantageError::not_found(req.path()))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;

    use libvantage::view::{ErrorResponse, MSG_RESOURCE_NOT_FOUND};

    use crate::server;
    use crate::test as helpers;

    #[actix_web::test]
    async fn test_unknown_route_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(server::app(helpers::app_data(dir.path()))).await;

        let req = test::TestRequest::get()
            .uri("/this-is-not/a-real-url")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.status_message, MSG_RESOURCE_NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_unknown_route_ignores_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let data = helpers::app_data_with_user(dir.path(), "testy", "testy");
        let app = test::init_service(server::app(data)).await;

        for auth in [
            helpers::basic_auth("testy", "testy"),
            helpers::basic_auth("testy", "wrong"),
        ] {
            let req = test::TestRequest::get()
                .uri("/this-is-not/a-real-url")
                .insert_header(auth)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        }
    }
}

use actix_web::{HttpRequest, HttpResponse};

use libvantage::error::VantageError;
use libvantage::view::VersionResponse;

use crate::app_data::app_data;

/// Recommended client version, read fresh on every request
pub async fn show(req: HttpRequest) -> Result<HttpResponse, VantageError> {
    let app_data = app_data(&req)?;
    Ok(HttpResponse::Ok().json(VersionResponse {
        version: app_data.settings.recommended_version(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;

    use libvantage::view::VersionResponse;

    use crate::server;
    use crate::test as helpers;

    #[actix_web::test]
    async fn test_version_reflects_latest_setting() {
        let dir = tempfile::tempdir().unwrap();
        let data = helpers::app_data(dir.path());
        let settings = data.settings.clone();
        let app = test::init_service(server::app(data)).await;

        let version = "1.2.3.4.5.6.7.8.9";
        settings.set_recommended_version(version);

        let req = test::TestRequest::get().uri("/version").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: VersionResponse = test::read_body_json(resp).await;
        assert_eq!(body.version, version);

        settings.set_recommended_version("2.0");
        let req = test::TestRequest::get().uri("/version").to_request();
        let body: VersionResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.version, "2.0");
    }

    #[actix_web::test]
    async fn test_version_needs_no_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(server::app(helpers::app_data(dir.path()))).await;

        let req = test::TestRequest::get().uri("/version").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

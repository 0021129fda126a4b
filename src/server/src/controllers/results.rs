use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};

use libvantage::constants::RESULT_FIELD;
use libvantage::error::VantageError;
use libvantage::view::{ListResultsResponse, StatusMessage, UploadResponse};

use crate::app_data::app_data;
use crate::auth::AuthenticatedClient;
use crate::helpers;

/// Names of the results the caller has uploaded
pub async fn index(client: AuthenticatedClient) -> Result<HttpResponse, VantageError> {
    let space = client.space().clone();
    let results = web::block(move || space.list_results()).await??;

    Ok(HttpResponse::Ok().json(ListResultsResponse {
        status: StatusMessage::resource_found(),
        results,
    }))
}

/// Stores the `result` file of a multipart form under the caller's results
/// directory. Served on both `POST /` and `POST /results`.
pub async fn upload(
    req: HttpRequest,
    client: AuthenticatedClient,
    payload: Multipart,
) -> Result<HttpResponse, VantageError> {
    let limit = app_data(&req)?.max_upload_bytes;
    let file = helpers::read_file_field(payload, RESULT_FIELD, limit).await?;

    let space = client.space().clone();
    let path = web::block(move || space.store_result(&file.filename, &file.bytes)).await??;
    log::info!("{} uploaded result {:?}", client.username(), path);

    Ok(HttpResponse::Created().json(UploadResponse {
        status: StatusMessage::resource_created(),
        filename: helpers::file_name(&path),
    }))
}

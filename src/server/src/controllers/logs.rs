use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};

use libvantage::constants::LOG_FIELD;
use libvantage::error::VantageError;
use libvantage::view::{StatusMessage, UploadResponse};

use crate::app_data::app_data;
use crate::auth::AuthenticatedClient;
use crate::helpers;

/// Stores the `log` file of a multipart form under the caller's logs directory
pub async fn upload(
    req: HttpRequest,
    client: AuthenticatedClient,
    payload: Multipart,
) -> Result<HttpResponse, VantageError> {
    let limit = app_data(&req)?.max_upload_bytes;
    let file = helpers::read_file_field(payload, LOG_FIELD, limit).await?;

    let space = client.space().clone();
    let path = web::block(move || space.store_log(&file.filename, &file.bytes)).await??;
    log::info!("{} uploaded log {:?}", client.username(), path);

    Ok(HttpResponse::Created().json(UploadResponse {
        status: StatusMessage::resource_created(),
        filename: helpers::file_name(&path),
    }))
}

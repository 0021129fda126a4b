use actix_files::NamedFile;
use actix_web::{web, HttpResponse};

use libvantage::error::VantageError;
use libvantage::view::{ListExperimentsResponse, StatusMessage};

use crate::auth::AuthenticatedClient;

/// Experiments an operator has placed in the caller's experiments directory
pub async fn index(client: AuthenticatedClient) -> Result<HttpResponse, VantageError> {
    let space = client.space().clone();
    let experiments = web::block(move || space.list_experiments()).await??;

    Ok(HttpResponse::Ok().json(ListExperimentsResponse {
        status: StatusMessage::resource_found(),
        experiments,
    }))
}

pub async fn download(
    client: AuthenticatedClient,
    name: web::Path<String>,
) -> Result<NamedFile, VantageError> {
    let path = client.space().experiment_path(&name)?;
    log::debug!("{} downloading experiment {:?}", client.username(), path);
    Ok(NamedFile::open(path)?)
}

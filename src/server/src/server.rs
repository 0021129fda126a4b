//! Building and binding the HTTP server

use std::net::SocketAddr;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use libvantage::config::ServerConfig;
use libvantage::constants::SHUTDOWN_TIMEOUT_SECS;
use libvantage::error::VantageError;

use crate::app_data::VantageAppData;
use crate::{controllers, routes};

/// The application every worker runs
pub fn app(
    data: web::Data<VantageAppData>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| VantageError::bad_request(err.to_string()).into());

    App::new()
        .app_data(data)
        .app_data(json_config)
        .wrap(Logger::default())
        .configure(routes::config)
        .default_service(web::to(controllers::not_found::index))
}

/// A bound, not yet running server.
///
/// Binding happens up front so callers learn the real address (port 0 picks a
/// free one) before the server is spawned onto its own task.
pub struct BoundServer {
    pub server: Server,
    pub addrs: Vec<SocketAddr>,
    pub data: web::Data<VantageAppData>,
}

pub fn bind(config: &ServerConfig, ip: &str, port: u16) -> Result<BoundServer, VantageError> {
    let data = web::Data::new(VantageAppData::from_config(config)?);
    let app_data = data.clone();

    let http_server = HttpServer::new(move || app(app_data.clone()))
        .client_request_timeout(config.client_request_timeout)
        .shutdown_timeout(SHUTDOWN_TIMEOUT_SECS)
        .bind((ip, port))?;
    let addrs = http_server.addrs();
    for addr in &addrs {
        log::info!("listening on http://{}", addr);
    }

    Ok(BoundServer {
        server: http_server.run(),
        addrs,
        data,
    })
}

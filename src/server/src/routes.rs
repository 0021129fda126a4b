use actix_web::web;

use crate::controllers;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(controllers::accounts::register)))
        .service(web::resource("/version").route(web::get().to(controllers::version::show)))
        .service(web::resource("/").route(web::post().to(controllers::results::upload)))
        .service(
            web::resource("/results")
                .route(web::get().to(controllers::results::index))
                .route(web::post().to(controllers::results::upload)),
        )
        .service(
            web::resource("/experiments").route(web::get().to(controllers::experiments::index)),
        )
        .service(
            web::resource("/experiments/{name}")
                .route(web::get().to(controllers::experiments::download)),
        )
        .service(web::resource("/logs").route(web::post().to(controllers::logs::upload)));
}

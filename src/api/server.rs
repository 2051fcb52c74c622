use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use crate::api::handlers;
use crate::config::ServeConfig;
use crate::model::manager::ModelRegistry;

pub struct AppState {
    pub registry: Arc<ModelRegistry>,
}

impl AppState {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::home))
        .route("/predict", web::post().to(handlers::predict));
}

pub fn run(
    listener: TcpListener,
    registry: ModelRegistry,
    config: &ServeConfig,
) -> Result<Server, std::io::Error> {
    let app_state = web::Data::new(AppState::new(registry));
    let payload_limit = config.payload_limit;

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .app_data(web::PayloadConfig::new(payload_limit))
            .configure(routes)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    Ok(server.listen(listener)?.run())
}

use actix_web::{middleware, web, App, HttpServer};
use log::info;
use std::io;

use depot::api;
use depot::app_state::AppState;
use depot::config::AppConfig;

/// Initializes log4rs from the configured file, falling back to env_logger
/// when the file cannot be loaded.
fn init_logging(config_file: &str) {
    if let Err(err) = log4rs::init_file(config_file, Default::default()) {
        env_logger::try_init().ok();
        log::warn!(
            "could not load log config {}, falling back to env_logger: {}",
            config_file,
            err
        );
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = AppConfig::load().map_err(|err| io::Error::other(err.to_string()))?;
    init_logging(&config.logging.config_file);

    let app_state = AppState::from_config(config.clone()).map_err(io::Error::other)?;
    let data = web::Data::new(app_state);

    let server = &config.server;
    let payload_limit = server.max_payload_size;
    info!("starting server on {}:{}", server.host, server.port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::PayloadConfig::default().limit(payload_limit))
            .app_data(data.clone())
            .service(api::create)
            .service(api::read)
            .service(api::update)
            .service(api::delete)
    })
    .workers(server.workers)
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}

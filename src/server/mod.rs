//! HTTP surface: one JSON route, `POST /process-image`.

mod handler;
pub mod routes;

use actix_cors::Cors;
use actix_web::{error::JsonPayloadError, middleware, web, App, HttpRequest, HttpServer};
use std::sync::Arc;

use crate::{
    config::ServerConfig,
    error::{Result, VisionError},
    inference::InferenceService,
};

pub use handler::{ImageQueryHandler, MISSING_IMAGE_MESSAGE};

// Body errors stay on the 500 path with the rest of the processing failures.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::error!("Error processing image: {}", err);
    VisionError::InternalError(err.to_string()).into()
}

/// Registers the JSON extractor limits and the route.
pub fn configure(max_body_bytes: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(
            web::JsonConfig::default()
                .limit(max_body_bytes)
                .error_handler(json_error),
        )
        .service(routes::process_image);
    }
}

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

pub async fn run(config: ServerConfig, service: Arc<dyn InferenceService>) -> Result<()> {
    let handler = web::Data::new(ImageQueryHandler::new(service));
    let max_body_bytes = config.max_body_bytes;
    let address = config.bind_address();

    HttpServer::new(move || {
        App::new()
            .app_data(handler.clone())
            .wrap(cors())
            .wrap(middleware::Logger::default())
            .configure(configure(max_body_bytes))
    })
    .bind(&address)
    .map_err(|e| VisionError::ConfigError(format!("Failed to bind {}: {}", address, e)))?
    .run()
    .await
    .map_err(|e| VisionError::InternalError(format!("Server error: {}", e)))
}

// src/routes/mod.rs
use crate::models::ServiceError;
use actix_web::web;
use log::debug;

pub mod admin_routes;
pub mod session_routes;
pub mod team_routes;
pub mod vote_routes;

// Malformed JSON bodies are reported as validation errors
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        debug!("Rejected JSON body on {}: {}", req.path(), err);
        ServiceError::Validation(format!("Invalid request body: {}", err)).into()
    })
}

// Register every route of the service
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    admin_routes::init_routes(cfg);
    session_routes::init_routes(cfg);
    team_routes::init_routes(cfg);
    vote_routes::init_routes(cfg);
}

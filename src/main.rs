//Third-party-dependencies
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;

use icebreaker_service::config::AppConfig;
use icebreaker_service::routes;
use icebreaker_service::utils::auth_middleware::Authentication;
use icebreaker_service::utils::session_storage::SessionStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let store = SessionStore::open(&config.storage_path, config.store_timeout)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let address = config.bind_address.clone();
    info!("Server started at {}", address);

    let config = web::Data::new(config);
    let store = web::Data::new(store);

    HttpServer::new(move || {
        let cors = config
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(Authentication::new(config.jwt_secret.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(routes::json_config())
            .app_data(config.clone())
            .app_data(store.clone())
            .configure(routes::init_routes) // utilises methods from routes
    })
        .bind(address)?
        .run()
        .await
}

// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, shared stores, and start HTTP server

use actix_web::{middleware::Logger, web, App, HttpServer};
use cafe_finder::config::Config;
use cafe_finder::handlers;
use cafe_finder::services::{start_cleanup_task, CafeSearchService, FavoritesStore, SearchSessions};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,reqwest=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting cafe-finder...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );
    log::info!("Geocoder: {}", config.nominatim_base_url);
    log::info!("POI endpoint: {}", config.overpass_base_url);

    // 4. Search sessions (latest fetch per UI session)
    let sessions = Arc::new(SearchSessions::new(config.session_ttl_secs));
    log::info!("Initialized search sessions (TTL: {}s)", config.session_ttl_secs);

    start_cleanup_task(sessions.clone(), 300);
    log::info!("Started session cleanup task (interval: 5 minutes)");

    // 5. External clients
    let service = match CafeSearchService::from_config(&config, sessions.clone()) {
        Ok(service) => web::Data::new(service),
        Err(e) => {
            log::error!("Failed to build HTTP clients: {}", e);
            std::process::exit(1);
        }
    };

    // 6. Favorites
    let favorites = web::Data::new(FavoritesStore::load(&config.favorites_path).await);

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let sessions_data = web::Data::new(sessions);

    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(service.clone())
            .app_data(favorites.clone())
            .app_data(sessions_data.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::cafes_config)
            .configure(handlers::favorites_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use geo_nearest::config::Settings;
use geo_nearest::core::Matcher;
use geo_nearest::logging;
use geo_nearest::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    logging::init(&settings.logging);

    info!("Starting Geo Nearest matching service...");
    info!(
        "Matching limits: {} points per set, {} decimals",
        settings.matching.max_points_per_set, settings.matching.display_precision
    );

    let app_state = AppState {
        matcher: Matcher::new(),
        matching: settings.matching.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))
    .inspect_err(|e| error!("Failed to bind: {}", e))?
    .run()
    .await
}

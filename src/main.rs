use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use matchme_directory::auth::TokenVerifier;
use matchme_directory::config::{BackendKind, Settings};
use matchme_directory::core::{Directory, Scorer};
use matchme_directory::routes::{self, handle_json_payload_error, handle_path_error, AppState};
use matchme_directory::services::{AppwriteClient, AppwriteCollections, Backend, PostgresClient};
use std::io;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn config_error(message: String) -> io::Error {
    error!("{}", message);
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

async fn connect_backend(settings: &Settings) -> io::Result<Backend> {
    match settings.store.backend {
        BackendKind::Appwrite => {
            let appwrite = settings
                .appwrite
                .clone()
                .ok_or_else(|| config_error("store.backend is appwrite but [appwrite] is missing".to_string()))?;

            let collections = AppwriteCollections {
                profiles: settings.collection.profiles.clone(),
                chats: settings.collection.chats.clone(),
                messages: settings.collection.messages.clone(),
            };

            let client = AppwriteClient::new(
                appwrite.endpoint,
                appwrite.api_key,
                appwrite.project_id,
                appwrite.database_id,
                collections,
            )
            .map_err(|e| config_error(format!("Failed to build Appwrite client: {}", e)))?;

            info!("Appwrite client initialized");
            Ok(Backend::Appwrite(client))
        }
        BackendKind::Postgres => {
            let database = settings
                .database
                .as_ref()
                .ok_or_else(|| config_error("store.backend is postgres but [database] is missing".to_string()))?;

            let client = PostgresClient::from_settings(
                &database.url,
                database.max_connections,
                database.min_connections,
                database.acquire_timeout_secs,
                database.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                io::Error::new(io::ErrorKind::ConnectionRefused, e.to_string())
            })?;

            info!(
                "PostgreSQL client initialized (max: {} connections)",
                database.max_connections.unwrap_or(10)
            );
            Ok(Backend::Postgres(client))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration before logging so the level and format apply
    let settings = Settings::load();

    let (config_level, config_format) = match &settings {
        Ok(s) => (s.logging.level.clone(), s.logging.format.clone()),
        Err(_) => ("info".to_string(), "json".to_string()),
    };
    let log_level = std::env::var("LOG_LEVEL").unwrap_or(config_level);
    let log_format = std::env::var("LOG_FORMAT").unwrap_or(config_format);

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting MatchMe directory service...");

    let settings = settings.map_err(|e| config_error(format!("Failed to load configuration: {}", e)))?;

    info!("Configuration loaded successfully");

    if settings.auth.jwt_secret == "change-me" {
        warn!("auth.jwt_secret is the placeholder value; set JWT_SECRET");
    }

    let backend = connect_backend(&settings).await?;

    let directory = Directory::with_page_size(backend, settings.search.page_size);
    let scorer = Scorer::new(settings.scoring.mode);

    info!(
        "Directory ready (backend: {}, page size: {}, scoring: {:?})",
        directory.store().name(),
        directory.page_size(),
        scorer.mode()
    );

    // Build application state
    let app_state = AppState {
        directory: Arc::new(directory),
        scorer,
        verifier: Arc::new(TokenVerifier::new(&settings.auth.jwt_secret)),
        chat_history_limit: settings.chat.history_limit,
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
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

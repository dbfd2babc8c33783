mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use crate::config::{Settings, StorageBackend};
use crate::core::CompatibilityEngine;
use models::{ErrorResponse, QuizSchema};
use routes::compatibility::AppState;
use services::{AnswerStore, CacheManager, LikeStore, MemoryStore, PostgresClient};
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error for malformed payloads and query strings
#[derive(Debug)]
pub struct JsonError(ErrorResponse);

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(&self.0)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError(ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    })
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError(ErrorResponse {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    })
    .into()
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    // LOG_LEVEL / LOG_FORMAT win over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());
    init_tracing(&log_level, &log_format);

    info!("Starting quiz-match compatibility service...");

    let (answers, likes): (Arc<dyn AnswerStore>, Arc<dyn LikeStore>) = match settings.storage.backend {
        StorageBackend::Postgres => {
            let db_max_conn = settings.database.max_connections.unwrap_or(10);

            let postgres = Arc::new(
                PostgresClient::from_settings(
                    &settings.database.url,
                    Some(db_max_conn),
                    settings.database.min_connections,
                    settings.database.acquire_timeout_secs,
                    settings.database.idle_timeout_secs,
                )
                .await
                .unwrap_or_else(|e| {
                    error!("Failed to connect to PostgreSQL: {}", e);
                    panic!("PostgreSQL connection error: {}", e);
                }),
            );

            info!("PostgreSQL store initialized (max: {} connections)", db_max_conn);
            (postgres.clone() as Arc<dyn AnswerStore>, postgres as Arc<dyn LikeStore>)
        }
        StorageBackend::Memory => {
            info!("Using in-memory store; data is lost on restart");
            let memory = Arc::new(MemoryStore::new());
            (memory.clone() as Arc<dyn AnswerStore>, memory as Arc<dyn LikeStore>)
        }
    };

    // Cache is optional - rankings are recomputed when it is unavailable
    let cache = if settings.cache.enabled {
        let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
        let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

        match CacheManager::new(&settings.cache.redis_url, l1_cache_size, cache_ttl).await {
            Ok(c) => {
                info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
                Some(Arc::new(c))
            }
            Err(e) => {
                error!("Failed to connect to Redis ({}), running without ranking cache", e);
                None
            }
        }
    } else {
        info!("Ranking cache disabled");
        None
    };

    let schema = QuizSchema::from(&settings.quiz);
    let engine = CompatibilityEngine::new(answers, likes, schema);

    info!(
        "Engine initialized: {} questions, {} options, top {}",
        schema.question_count, schema.option_count, settings.ranking.top_n
    );

    let app_state = AppState {
        engine,
        cache,
        ranking: settings.ranking.clone(),
    };

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
    .bind((host, port))?
    .run()
    .await
}

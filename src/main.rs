use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use lostfound_algo::config::Settings;
use lostfound_algo::core::Matcher;
use lostfound_algo::routes::{self, AppState};
use lostfound_algo::services::{spawn_sweeper, CacheManager, MatchService, PostgresClient, TokenVerifier};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Lost & Found matching service...");

    // Initialize cache manager (optional - app can work without Redis)
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(600);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match settings.cache.redis_url.as_deref() {
        Some(url) => match CacheManager::new(url, l1_cache_size, cache_ttl).await {
            Ok(c) => {
                info!("Cache manager initialized (L1: {} entries, TTL: {}s, Redis L2)", l1_cache_size, cache_ttl);
                c
            }
            Err(e) => {
                warn!("Failed to connect to Redis ({}), caching in-process only", e);
                CacheManager::in_memory(l1_cache_size, cache_ttl)
            }
        },
        None => {
            info!("No Redis configured, caching in-process only (TTL: {}s)", cache_ttl);
            CacheManager::in_memory(l1_cache_size, cache_ttl)
        }
    };
    let cache = Arc::new(cache);

    // Initialize PostgreSQL client
    let db_max_conn = settings.database.max_connections.unwrap_or(10);

    let postgres = match PostgresClient::from_settings(
        &settings.database.url,
        Some(db_max_conn),
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to connect to PostgreSQL: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    // Initialize matcher with configured weights
    let weights = settings.scoring_weights();
    let matcher = Matcher::new(weights, settings.matching.options());

    info!("Matcher initialized with weights: {:?}, options: {:?}", weights, matcher.options());

    let service = Arc::new(MatchService::new(
        postgres,
        cache,
        matcher,
        settings.matching.window_days,
        settings.matching.similar_limit,
    ));

    if settings.sweep.enabled {
        let interval = Duration::from_secs(settings.sweep.interval_secs);
        spawn_sweeper(service.clone(), interval);
        info!("Match sweep scheduled every {}s", settings.sweep.interval_secs);
    }

    // Build application state
    let app_state = AppState {
        service,
        verifier: TokenVerifier::new(&settings.auth.jwt_secret),
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
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes::<PostgresClient>)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

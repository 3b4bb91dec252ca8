//! LoanLink Backend Server
//!
//! Backend for the LoanLink lending marketplace: loan offers, loan
//! applications, and user accounts over a document store.

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use loanlink_server::config::Config;
use loanlink_server::store::{PgStore, Store};
use loanlink_server::{db, middleware, routes, state::AppState};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting LoanLink server");

    // Connect to the store and provision the collections
    let pool = match db::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database connection failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(&pool).await {
        tracing::error!("Migration failed: {}", e);
        std::process::exit(1);
    }

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool.clone()));
    let app_state = AppState::from_store(store);

    // Clone pool for the health check
    let health_pool = pool.clone();

    // Create the app router
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(move || health_check(health_pool.clone())))
        .merge(routes::loan_routes())
        .merge(routes::application_routes())
        .merge(routes::user_routes())
        .with_state(app_state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(configure_cors(&config));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    tracing::info!("LoanLink server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    tracing::info!("Server shutdown complete");
}

async fn root() -> &'static str {
    "LoanLink Server is running"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    version: String,
}

/// Health check endpoint: probes store connectivity
async fn health_check(pool: sqlx::PgPool) -> axum::Json<HealthResponse> {
    let db_status = match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if db_status == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    axum::Json(HealthResponse {
        status: status.to_string(),
        database: db_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn configure_cors(config: &Config) -> CorsLayer {
    let Some(allowed_origins) = config.cors_allowed_origins.as_deref() else {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

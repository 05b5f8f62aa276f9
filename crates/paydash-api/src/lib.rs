//! HTTP API server for the transactions dashboard
//!
//! Routes are organized into modules:
//! - routes::transactions: transaction list and dashboard stats

pub mod error;
pub mod routes;

use anyhow::Context;
use axum::http::{Method, Uri};
use axum::{routing::get, Router};
use paydash_config::Config;
use paydash_core::{api, TransactionStorage, TransactionStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TransactionStorage>,
    pub config: Config,
}

/// Create the store from configuration and seed it before any request is served
pub fn build_state(config: Config) -> AppState {
    let store = TransactionStore::from_config(&config);
    let created = store.seed();
    log::info!("Store ready with {} transactions ({} seeded)", store.len(), created);

    AppState {
        store: Arc::new(store),
        config,
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::transactions::{api_stats, api_transactions};

    Router::new()
        .route(api::HEALTH, get(health_check).fallback(method_not_allowed))
        .route(api::TRANSACTIONS_LIST.path, get(api_transactions).fallback(method_not_allowed))
        .route(api::TRANSACTIONS_STATS.path, get(api_stats).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound {
        resource: uri.path().to_string(),
    }
}

/// Known path, unsupported method
async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        resource: uri.path().to_string(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

/// Bind the configured address and serve until Ctrl-C
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let addr = config.listen_addr();
    let router = create_router(build_state(config));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    log::info!("Starting paydash server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - GET {} (Transaction list)", api::TRANSACTIONS_LIST.path);
    log::info!("  - GET {} (Dashboard stats)", api::TRANSACTIONS_STATS.path);
    log::info!("  - GET {} (Health check)", api::HEALTH);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    log::info!("Server stopped gracefully");
    Ok(())
}

// ==================== Tests ====================

//! Pharmacy API server implementation
//!
//! HTTP REST API server using Axum: template upload plus pharmacy CRUD.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::store::{JsonStore, PharmacyStore, RecordSource};

/// API Server configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// JSON file backing the pharmacy collection; in-memory when unset
    pub data_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            data_path: None,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub version: String,
    pub pharmacies: Arc<dyn PharmacyStore>,
    pub records: Arc<dyn RecordSource>,
}

impl AppState {
    /// State where CRUD and template filling share one store.
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            pharmacies: store.clone(),
            records: store,
        }
    }
}

/// Build the router with all routes and middleware
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/excel/upload", post(handlers::upload_excel))
        .route(
            "/api/pharmacies",
            get(handlers::list_pharmacies).post(handlers::create_pharmacy),
        )
        .route(
            "/api/pharmacies/:id",
            get(handlers::get_pharmacy).patch(handlers::update_pharmacy),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured host and port. Host names are resolved, so
/// `localhost` works as well as an IP literal.
pub async fn bind_listener(config: &ApiConfig) -> std::io::Result<TcpListener> {
    TcpListener::bind((config.host.as_str(), config.port)).await
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pharmacy_server=info,pharmacy_sheets=info,tower_http=info".into()
            }),
        )
        .init();

    let store = match &config.data_path {
        Some(path) => JsonStore::open(path).await?,
        None => {
            info!("No data file configured, pharmacies are kept in memory");
            JsonStore::in_memory()
        }
    };
    let state = Arc::new(AppState::new(Arc::new(store)));
    let app = router(state, config.max_upload_bytes);

    let listener = bind_listener(&config).await?;
    info!(
        "💊 Pharmacy API Server starting on http://{}",
        listener.local_addr()?
    );
    info!("   Endpoints: /api/excel/upload, /api/pharmacies, /api/pharmacies/:id");
    info!("   Health: /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Pharmacy API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert!(config.data_path.is_none());
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_bind_listener_ip_literal() {
        let config = ApiConfig {
            port: 0,
            ..Default::default()
        };
        let listener = bind_listener(&config).await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_bind_listener_resolves_localhost() {
        let config = ApiConfig {
            host: "localhost".to_string(),
            port: 0,
            ..Default::default()
        };
        let listener = bind_listener(&config).await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[test]
    fn test_app_state_shares_store() {
        let store = Arc::new(JsonStore::in_memory());
        let state = AppState::new(store.clone());
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
        // store + two trait-object handles
        assert_eq!(Arc::strong_count(&store), 3);
    }
}

pub mod capture;
pub mod handlers;
pub mod models;

use axum::{
    routing::{any, get},
    Router,
};
use std::{future::Future, net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;

use hookbin_db::{IngestWriter, QueryEngine, Storage};

/// Default cap on captured body size (2 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Application state shared across handlers
pub struct AppState {
    pub storage: Storage,
    pub ingest: IngestWriter,
    pub engine: QueryEngine,
    pub max_body_bytes: usize,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hookbin API",
        version = "0.1.0",
        description = "Capture arbitrary webhooks and inspect the last 24 hours of traffic"
    ),
    paths(
        handlers::capture_webhook,
        handlers::capture_webhook_for_uid,
        handlers::list_logs,
        handlers::health_check,
    ),
    components(
        schemas(
            models::CaptureResponse,
            models::CapturedRequest,
            models::LogsResponse,
            models::ErrorResponse,
            models::HealthResponse,
        )
    ),
    tags(
        (name = "capture", description = "Webhook capture endpoints"),
        (name = "logs", description = "Captured traffic inspection"),
        (name = "system", description = "System health and info endpoints")
    )
)]
pub struct ApiDoc;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Allow cross-origin reads (for a UI served from another origin)
    pub enable_cors: bool,
    /// Bodies larger than this are rejected with 413
    pub max_body_bytes: usize,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            enable_cors: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server on top of an opened store
    pub fn new(config: ApiServerConfig, storage: Storage) -> Self {
        let state = Arc::new(AppState {
            ingest: IngestWriter::new(storage.clone()),
            engine: QueryEngine::new(storage.clone()),
            storage,
            max_body_bytes: config.max_body_bytes,
        });

        Self { config, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        // Capture routes take every method, OPTIONS included, so CORS must not
        // answer preflights on their behalf.
        let capture_router = Router::new()
            .route("/api/webhook", any(handlers::capture_webhook))
            .route("/api/webhook/{uid}", any(handlers::capture_webhook_for_uid))
            .with_state(self.state.clone());

        let mut read_router = Router::new()
            .route("/api/logs", get(handlers::list_logs))
            .route("/api/health", get(handlers::health_check))
            .route("/api/openapi.json", get(handlers::openapi_json))
            .with_state(self.state.clone());

        if self.config.enable_cors {
            read_router = read_router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        capture_router
            .merge(read_router)
            .layer(TraceLayer::new_for_http())
    }

    /// Start the API server and run until `shutdown` resolves
    pub async fn start<F>(self, shutdown: F) -> Result<(), anyhow::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();

        info!("Starting API server on {}", self.config.bind_addr);
        info!(
            "Capture endpoint: http://{}/api/webhook[/{{uid}}]",
            self.config.bind_addr
        );
        info!(
            "OpenAPI spec: http://{}/api/openapi.json",
            self.config.bind_addr
        );

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        Ok(())
    }
}

//! API Server - HTTP server for the mock email API

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{self, AppState};
use crate::config::SesMockConfig;
use crate::engine::SesService;
use crate::error::Result;
use crate::metrics::SendMetrics;

/// API Server configuration
pub struct ApiServer {
    state: Arc<AppState>,
    addr: SocketAddr,
}

impl ApiServer {
    /// Create a new API server from configuration
    pub fn new(config: &SesMockConfig, metrics: Arc<SendMetrics>) -> Result<Self> {
        config.validate()?;
        let service = Arc::new(SesService::from_config(config, Arc::clone(&metrics)));

        Ok(Self {
            state: Arc::new(AppState { service, metrics }),
            addr: config.listen_addr()?,
        })
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Start the API server
    pub async fn run(&self) -> Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

/// Build the router around existing state
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let v1 = Router::new()
        .route("/email/send", post(handlers::send_email))
        .route("/email/statistics", get(handlers::get_send_statistics))
        .route(
            "/email/detailed-statistics",
            get(handlers::get_detailed_statistics),
        )
        .route("/email/quota", get(handlers::get_send_quota))
        .route("/email/warmup-status", get(handlers::get_warmup_status))
        .route("/identities", get(handlers::list_identities));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .nest("/v1", v1)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

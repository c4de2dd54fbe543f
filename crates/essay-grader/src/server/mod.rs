//! HTTP server for extraction and evaluation

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::GraderConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Grading HTTP server
pub struct GraderServer {
    config: GraderConfig,
    state: AppState,
}

impl GraderServer {
    /// Create a new server with the remote providers from `config`
    pub fn new(config: GraderConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = build_router(self.state);

        tracing::info!("Starting grading server on http://{}", addr);
        tracing::info!("Extraction model: {}", self.config.gemini.default_model);
        tracing::info!("DeepSeek model: {}", self.config.github.deepseek_model);
        tracing::info!("GPT model: {}", self.config.github.gpt_model);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the router with all routes
pub fn build_router(state: AppState) -> Router {
    let config = state.config();
    let enable_cors = config.server.enable_cors;
    let body_limit = config.upload.body_limit();

    let router = Router::new()
        .route("/health", get(health_check))
        .merge(routes::api_routes(body_limit))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

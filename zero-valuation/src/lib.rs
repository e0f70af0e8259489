//! Zero Valuation - DCF equity valuation engine for the Zero ecosystem.
//!
//! The engine is pure and synchronous:
//! - `dcf`: cash-flow projection, discounting, terminal value, fair value
//! - `profile`: questionnaire scoring into an investor category
//! - `judgement`: fair value vs. price against the category's margin of safety
//! - `distribution`: skewed price histogram for charting
//!
//! A thin axum service exposes it as JSON.

pub mod analysis;
pub mod batch;
pub mod dcf;
pub mod distribution;
pub mod error;
pub mod input;
pub mod judgement;
pub mod profile;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use zero_common::config::Config;
use zero_common::logging::Metrics;

pub use analysis::{AnalysisReport, AnalyzeRequest, ValuationPipeline};
pub use error::ValuationError;
pub use routes::build_router;

/// Service name reported in health checks and request spans.
pub const SERVICE_NAME: &str = "zero-valuation";

/// Default maximum JSON body size (1 MiB).
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Shared service state.
pub struct ValuationState {
    /// Configuration
    pub config: Config,
    /// Engine and judgement analyzer built from `config.valuation`
    pub pipeline: ValuationPipeline,
    /// Request counters
    pub metrics: Metrics,
    /// Watchlist batch limit
    pub max_batch_size: usize,
    pub started_at: Instant,
}

impl ValuationState {
    /// Create state from configuration.
    pub fn new(config: Config) -> Self {
        let pipeline = ValuationPipeline::from_settings(&config.valuation);
        let max_batch_size = config
            .valuation
            .max_batch_size
            .unwrap_or(batch::DEFAULT_MAX_BATCH_SIZE);

        Self {
            config,
            pipeline,
            metrics: Metrics::new(),
            max_batch_size,
            started_at: Instant::now(),
        }
    }
}

/// Build the full application: routes plus CORS and body-limit layers.
pub fn build_app(state: Arc<ValuationState>) -> Router {
    let body_limit = state
        .config
        .valuation
        .request_body_limit_bytes
        .unwrap_or(DEFAULT_BODY_LIMIT_BYTES);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    build_router(state)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
}

/// Main valuation service
pub struct ValuationService {
    state: Arc<ValuationState>,
}

impl ValuationService {
    /// Create a new valuation service
    pub fn new(config: Config) -> Self {
        Self {
            state: Arc::new(ValuationState::new(config)),
        }
    }

    /// Start the HTTP server and run until Ctrl-C.
    pub async fn start(self) -> Result<()> {
        let host = self.state.config.bind_address().to_string();
        let port = self.state.config.valuation_port();

        let app = build_app(Arc::clone(&self.state));

        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        tracing::info!(address = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Valuation service stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

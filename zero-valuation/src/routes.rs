//! HTTP routes for the valuation service.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use zero_common::logging::{MetricsSummary, RequestContext};

use crate::analysis::AnalyzeRequest;
use crate::batch::analyze_watchlist;
use crate::distribution::generate_distribution;
use crate::error::{Result, ValuationError};
use crate::input::DcfForm;
use crate::profile::{self, AnswerInput, InvestorCategory, InvestorResponse};
use crate::{ValuationState, SERVICE_NAME};

type ApiResult = std::result::Result<Json<Value>, ValuationError>;

/// Build the application router.
pub fn build_router(state: Arc<ValuationState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/status", get(get_status))
        // Profiling
        .route("/api/v1/questionnaire", get(get_questionnaire))
        .route("/api/v1/profile", post(classify_profile))
        // Valuation
        .route("/api/v1/dcf", post(run_dcf))
        .route("/api/v1/judgement", post(judge_valuation))
        .route("/api/v1/distribution", post(build_distribution))
        .route("/api/v1/analyze", post(analyze))
        .route("/api/v1/watchlist/analyze", post(analyze_watchlist_batch))
        .with_state(state)
}

/// Wrap an engine outcome in the response envelope and record it.
async fn respond<T: Serialize>(
    state: &ValuationState,
    ctx: &RequestContext,
    operation: &'static str,
    start: Instant,
    outcome: Result<T>,
) -> ApiResult {
    let duration_ms = start.elapsed().as_millis() as u64;
    state
        .metrics
        .record_request(duration_ms, outcome.is_ok())
        .await;

    match outcome {
        Ok(data) => {
            tracing::debug!(trace_id = %ctx.trace_id, operation, duration_ms, "Request handled");
            Ok(Json(json!({ "success": true, "data": data })))
        }
        Err(e) => {
            tracing::warn!(
                trace_id = %ctx.trace_id,
                operation,
                code = e.code(),
                error = %e,
                "Request rejected"
            );
            Err(e)
        }
    }
}

// ============================================================================
// Health & Status
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub service: String,
    pub endpoint: String,
    pub uptime_secs: u64,
    pub generated_at: String,
    pub max_batch_size: usize,
    pub requests: MetricsSummary,
}

pub async fn get_status(State(state): State<Arc<ValuationState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: SERVICE_NAME.to_string(),
        endpoint: state.config.valuation_endpoint(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        max_batch_size: state.max_batch_size,
        requests: state.metrics.summary().await,
    })
}

// ============================================================================
// Profile Routes
// ============================================================================

pub async fn get_questionnaire() -> Json<Value> {
    let questions = profile::questions();
    Json(json!({
        "success": true,
        "data": {
            "questions": questions,
            "maxScore": profile::questionnaire::max_score(),
        }
    }))
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(alias = "responses")]
    pub answers: Vec<AnswerInput>,
}

pub async fn classify_profile(
    State(state): State<Arc<ValuationState>>,
    headers: HeaderMap,
    Json(request): Json<ProfileRequest>,
) -> ApiResult {
    let ctx = RequestContext::from_headers(&headers, SERVICE_NAME);
    let start = Instant::now();

    let outcome = ctx.span("profile").in_scope(|| {
        let responses = request
            .answers
            .iter()
            .map(AnswerInput::resolve)
            .collect::<Result<Vec<InvestorResponse>>>()?;
        profile::assess(&responses)
    });

    respond(&state, &ctx, "profile", start, outcome).await
}

// ============================================================================
// Valuation Routes
// ============================================================================

pub async fn run_dcf(
    State(state): State<Arc<ValuationState>>,
    headers: HeaderMap,
    Json(form): Json<DcfForm>,
) -> ApiResult {
    let ctx = RequestContext::from_headers(&headers, SERVICE_NAME);
    let start = Instant::now();

    let outcome = ctx
        .span("dcf")
        .in_scope(|| state.pipeline.value_form(&form));

    respond(&state, &ctx, "dcf", start, outcome).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgementRequest {
    pub fair_value: f64,
    pub current_price: f64,
    #[serde(default, alias = "investorProfile")]
    pub category: Option<InvestorCategory>,
    #[serde(default)]
    pub ticker: Option<String>,
}

pub async fn judge_valuation(
    State(state): State<Arc<ValuationState>>,
    headers: HeaderMap,
    Json(request): Json<JudgementRequest>,
) -> ApiResult {
    let ctx = RequestContext::from_headers(&headers, SERVICE_NAME);
    let start = Instant::now();

    let outcome = ctx.span("judgement").in_scope(|| {
        state.pipeline.judgement().judge(
            request.fair_value,
            request.current_price,
            request.category.unwrap_or(InvestorCategory::Moderate),
            request.ticker.as_deref(),
        )
    });

    respond(&state, &ctx, "judgement", start, outcome).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionRequest {
    pub fair_value: f64,
    pub current_price: f64,
    #[serde(default, alias = "investorProfile")]
    pub category: Option<InvestorCategory>,
}

pub async fn build_distribution(
    State(state): State<Arc<ValuationState>>,
    headers: HeaderMap,
    Json(request): Json<DistributionRequest>,
) -> ApiResult {
    let ctx = RequestContext::from_headers(&headers, SERVICE_NAME);
    let start = Instant::now();

    let outcome = ctx.span("distribution").in_scope(|| {
        generate_distribution(
            request.fair_value,
            request.current_price,
            request.category.unwrap_or(InvestorCategory::Moderate),
        )
    });

    respond(&state, &ctx, "distribution", start, outcome).await
}

pub async fn analyze(
    State(state): State<Arc<ValuationState>>,
    headers: HeaderMap,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult {
    let ctx = RequestContext::from_headers(&headers, SERVICE_NAME);
    let start = Instant::now();

    let outcome = ctx
        .span("analyze")
        .in_scope(|| state.pipeline.analyze(&request));

    respond(&state, &ctx, "analyze", start, outcome).await
}

#[derive(Debug, Deserialize)]
pub struct WatchlistRequest {
    pub entries: Vec<AnalyzeRequest>,
}

pub async fn analyze_watchlist_batch(
    State(state): State<Arc<ValuationState>>,
    headers: HeaderMap,
    Json(request): Json<WatchlistRequest>,
) -> ApiResult {
    let ctx = RequestContext::from_headers(&headers, SERVICE_NAME);
    let start = Instant::now();

    // CPU-bound fan-out on the rayon pool, off the async workers
    let worker_state = Arc::clone(&state);
    let span = ctx.span("watchlist");
    let outcome = tokio::task::spawn_blocking(move || {
        span.in_scope(|| {
            analyze_watchlist(
                &worker_state.pipeline,
                &request.entries,
                worker_state.max_batch_size,
            )
        })
    })
    .await
    .unwrap_or_else(|e| {
        tracing::error!(error = %e, "Watchlist worker panicked");
        Err(ValuationError::Internal(
            "watchlist worker terminated unexpectedly".into(),
        ))
    });

    respond(&state, &ctx, "watchlist", start, outcome).await
}

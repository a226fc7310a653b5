//! HTTP handler for the Anxiety Severity Agent

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::AgentConfig;
use crate::contracts::*;
use crate::engine::ClassificationEngine;
use crate::error::{AgentError, Result};
use crate::telemetry::{SeverityMetrics, SignalEmitter};

/// Application state
pub struct AppState {
    pub engine: ClassificationEngine,
    pub telemetry: SignalEmitter,
    pub metrics: Arc<SeverityMetrics>,
}

impl AppState {
    /// Build state from configuration; spawns the signal task when enabled
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let metrics = Arc::new(SeverityMetrics::new().map_err(|e| {
            AgentError::InternalError(format!("Failed to register metrics: {}", e))
        })?);

        Ok(Self {
            engine: ClassificationEngine::with_thresholds(config.thresholds)?,
            telemetry: SignalEmitter::new(&config.telemetry, Arc::clone(&metrics)),
            metrics,
        })
    }
}

/// Bind the configured address and serve until the process is stopped
pub async fn serve(config: &AgentConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| AgentError::config_error(format!("Invalid listen address: {}", e)))?;

    let state = Arc::new(AppState::new(config)?);
    let router = create_router(Arc::clone(&state));

    tracing::info!("Starting Anxiety Severity Agent on {}", addr);
    tracing::info!(
        "Agent ID: {}, Version: {}, thresholds: {}",
        AnxietySeveritySignal::AGENT_ID,
        AnxietySeveritySignal::AGENT_VERSION,
        state.engine.thresholds().describe().join(", ")
    );
    tracing::info!(signals_enabled = state.telemetry.is_enabled(), "Signal emission");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AgentError::InternalError(format!("Failed to bind {}: {}", addr, e)))?;
    axum::serve(listener, router)
        .await
        .map_err(|e| AgentError::InternalError(format!("Server error: {}", e)))?;

    Ok(())
}

/// Create the router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/v1/severity/thresholds", get(thresholds))
        .route("/api/v1/severity/classify", post(classify))
        .route("/api/v1/severity/check", post(check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        agent_id: AnxietySeveritySignal::AGENT_ID.to_string(),
        agent_version: AnxietySeveritySignal::AGENT_VERSION.to_string(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            e.to_string(),
        ),
    }
}

/// Reading floors for a baseline
async fn thresholds(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ThresholdsQuery>,
) -> std::result::Result<Json<ThresholdsResponse>, (StatusCode, Json<ApiError>)> {
    let floors = state
        .engine
        .thresholds()
        .bpm_floors(query.baseline_bpm)
        .map_err(|e| api_error(&state, &AgentError::from(e), None))?;

    Ok(Json(ThresholdsResponse {
        baseline_bpm: query.baseline_bpm,
        floors,
    }))
}

/// Classify readings and emit a decision signal
async fn classify(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ClassifyRequest>, JsonRejection>,
) -> std::result::Result<Json<ApiResponse<ClassificationOutput>>, (StatusCode, Json<ApiError>)> {
    let Json(request) = payload.map_err(|e| api_error(&state, &rejected_body(e), None))?;
    let input = ClassificationEngine::create_input(request, "anonymous".to_string());
    let request_id = input.request_id;
    let inputs_hash = ClassificationEngine::compute_inputs_hash(&input);

    let output = state
        .engine
        .classify(&input)
        .map_err(|e| api_error(&state, &e, Some(request_id)))?;

    state.metrics.record_output(&output);

    let signal = AnxietySeveritySignal::from_classification(
        inputs_hash,
        &output,
        request_id.to_string(),
    )
    .with_metadata("requested_by", serde_json::json!(input.requested_by));
    tracing::info!(request_id = %request_id, "{}", signal.summary());
    if let Err(e) = state.telemetry.emit(signal) {
        tracing::warn!(request_id = %request_id, error = %e, "Failed to emit telemetry");
    }

    Ok(Json(ApiResponse {
        success: true,
        data: output,
        request_id,
    }))
}

/// Quick classification; counted in metrics but emits no decision signal
async fn check(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ClassifyRequest>, JsonRejection>,
) -> std::result::Result<Json<CheckResponse>, (StatusCode, Json<ApiError>)> {
    let Json(request) = payload.map_err(|e| api_error(&state, &rejected_body(e), None))?;
    let input = ClassificationEngine::create_input(request, "anonymous".to_string());

    let output = state
        .engine
        .classify(&input)
        .map_err(|e| api_error(&state, &e, Some(input.request_id)))?;

    state.metrics.record_output(&output);

    Ok(Json(CheckResponse {
        anxiety_detected: output.anxiety_detected(),
        peak_severity: output.peak_severity.to_string(),
        event_count: output.event_count(),
        reading_count: output.assessments.len(),
        duration_ms: output.duration_ms,
    }))
}

fn rejected_body(rejection: JsonRejection) -> AgentError {
    AgentError::invalid_input(format!("Malformed request body: {}", rejection.body_text()))
}

fn api_error(
    state: &AppState,
    err: &AgentError,
    request_id: Option<Uuid>,
) -> (StatusCode, Json<ApiError>) {
    state.metrics.record_error(err.code());

    let status = if err.is_user_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    tracing::debug!(error = %err, status = %status, "Request rejected");

    (
        status,
        Json(ApiError {
            error: err.code().to_string(),
            message: err.to_string(),
            request_id,
        }),
    )
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub agent_id: String,
    pub agent_version: String,
}

#[derive(Debug, Deserialize)]
pub struct ThresholdsQuery {
    pub baseline_bpm: f64,
}

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub request_id: Uuid,
}

/// Check response (lightweight)
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub anxiety_detected: bool,
    pub peak_severity: String,
    pub event_count: usize,
    pub reading_count: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    pub request_id: Option<Uuid>,
}

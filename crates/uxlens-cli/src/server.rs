//! HTTP surface for the analysis pipeline
//!
//! `POST /analyze/stream` answers with a `text/event-stream` of
//! `data: {"type": ..., "data": ...}` frames ending in exactly one
//! `result` or `error` event. `POST /analyze` runs the same flow and
//! answers once with the document or the error payload. Request errors
//! are rejected as JSON before any stream is opened.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uxlens_core::{AnalysisOrchestrator, AnalysisRequest, Error, ErrorCode, NoopReporter};
use uxlens_schemas::SCHEMA_VERSION;


/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<AnalysisOrchestrator>,
    allowed_origins: Vec<String>,
    started_at: DateTime<Utc>,
}

impl AppState {
    #[must_use]
    pub fn new(orchestrator: Arc<AnalysisOrchestrator>, allowed_origins: Vec<String>) -> Self {
        Self {
            orchestrator,
            allowed_origins,
            started_at: Utc::now(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route("/healthz", get(health))
        .route(
            "/analyze/stream",
            post(analyze_stream).options(preflight).fallback(method_not_allowed),
        )
        .route(
            "/analyze",
            post(analyze).options(preflight).fallback(method_not_allowed),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("apikey"),
            header::HeaderName::from_static("x-client-info"),
        ])
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    schema_version: &'static str,
    uptime_seconds: i64,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        schema_version: SCHEMA_VERSION,
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
    })
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed(method: Method) -> Response {
    ApiError::MethodNotAllowed(method).into_response()
}

async fn analyze_stream(
    State(state): State<AppState>,
    body: std::result::Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = accept(body, true)?;
    info!(context_len = request.context.len(), "Opening analysis stream");

    let events = state
        .orchestrator
        .clone()
        .stream(request)
        .map(|event| Event::default().json_data(&event));

    Ok(Sse::new(events).into_response())
}

async fn analyze(
    State(state): State<AppState>,
    body: std::result::Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = accept(body, false)?;
    let document = state
        .orchestrator
        .analyze(&request, &mut NoopReporter)
        .await
        .map_err(ApiError::Analysis)?;
    Ok(Json(document).into_response())
}

/// Decode and check the body before any work starts
fn accept(
    body: std::result::Result<Json<AnalysisRequest>, JsonRejection>,
    require_job: bool,
) -> Result<AnalysisRequest, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        ApiError::Analysis(Error::invalid_request("body", rejection.body_text()))
    })?;
    request.validate(require_job).map_err(ApiError::Analysis)?;
    Ok(request)
}

#[derive(Debug)]
enum ApiError {
    MethodNotAllowed(Method),
    Analysis(Error),
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::SchemaViolation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::ProviderError | ErrorCode::EmptyModelResponse | ErrorCode::InvalidModelOutput => {
            StatusCode::BAD_GATEWAY
        }
        ErrorCode::ConfigNotFound | ErrorCode::ConfigError | ErrorCode::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::MethodNotAllowed(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "POST, OPTIONS")],
                Json(json!({
                    "error": format!("Method {} not allowed", method),
                    "code": "METHOD_NOT_ALLOWED",
                })),
            )
                .into_response(),
            Self::Analysis(error) => {
                let status = status_for(error.code());
                if status.is_server_error() {
                    warn!(code = %error.code(), error = %error, "Analysis request failed");
                }
                (status, Json(error.to_payload())).into_response()
            }
        }
    }
}

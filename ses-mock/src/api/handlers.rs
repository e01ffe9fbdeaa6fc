//! API request handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use crate::engine::SesService;
use crate::error::SesError;
use crate::metrics::SendMetrics;
use crate::models::{
    DetailedStatistics, ListIdentitiesOutput, QuotaInfo, SendEmailInput, SendEmailOutput,
    Statistics, WarmupRules,
};

/// Shared application state
pub struct AppState {
    pub service: Arc<SesService>,
    pub metrics: Arc<SendMetrics>,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    /// Malformed or incomplete request body
    pub fn invalid_request() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "InvalidParameterValue",
            "Invalid request body",
        )
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "InternalError",
            "An internal error occurred",
        )
    }
}

impl From<SesError> for ApiError {
    fn from(err: SesError) -> Self {
        if err.is_client_error() {
            Self::new(StatusCode::BAD_REQUEST, err.code(), &err.to_string())
        } else {
            error!("Unexpected error while handling request: {}", err);
            Self::internal()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// GET /health - Liveness check
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /v1/email/send - Simulate sending an email
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendEmailInput>, JsonRejection>,
) -> Result<Json<SendEmailOutput>, ApiError> {
    let Json(input) = payload.map_err(|e| {
        debug!("Rejected request body: {}", e);
        ApiError::invalid_request()
    })?;

    if let Some(field) = input.missing_field() {
        debug!("Missing required field: {}", field);
        return Err(ApiError::invalid_request());
    }

    let output = state.service.send_email(&input)?;
    Ok(Json(output))
}

/// GET /v1/email/statistics - Basic send statistics
pub async fn get_send_statistics(State(state): State<Arc<AppState>>) -> Json<Statistics> {
    Json(state.service.get_statistics())
}

/// GET /v1/email/detailed-statistics - Statistics with warm-up and performance views
pub async fn get_detailed_statistics(
    State(state): State<Arc<AppState>>,
) -> Json<DetailedStatistics> {
    Json(state.service.get_detailed_statistics())
}

/// GET /v1/email/quota - Sending quota
pub async fn get_send_quota(State(state): State<Arc<AppState>>) -> Json<QuotaInfo> {
    Json(state.service.get_quota())
}

/// GET /v1/email/warmup-status - Warm-up state
pub async fn get_warmup_status(State(state): State<Arc<AppState>>) -> Json<WarmupRules> {
    Json(state.service.get_warmup_status())
}

/// GET /v1/identities - Verified sender identities
pub async fn list_identities(State(state): State<Arc<AppState>>) -> Json<ListIdentitiesOutput> {
    Json(state.service.list_identities())
}

/// GET /metrics - Prometheus counters
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.to_prometheus(),
    )
}

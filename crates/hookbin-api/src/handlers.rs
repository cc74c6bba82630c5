use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    Json,
};
use hookbin_db::Uid;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use utoipa::OpenApi;

use crate::capture::{self, CaptureError};
use crate::models::*;
use crate::{ApiDoc, AppState};

pub const INVALID_UID_MESSAGE: &str = "Invalid UID. UID must be 8-14 alphanumeric characters.";
const CAPTURE_FAILED_MESSAGE: &str = "Failed to process webhook";
const FETCH_FAILED_MESSAGE: &str = "Failed to fetch webhooks";

type ApiError = (StatusCode, Json<ErrorResponse>);

fn failure(status: StatusCode, message: &str) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

/// Capture a webhook (any HTTP method)
#[utoipa::path(
    post,
    path = "/api/webhook",
    request_body(content = String, description = "Arbitrary payload. Every HTTP method is accepted."),
    responses(
        (status = 200, description = "Webhook recorded", body = CaptureResponse),
        (status = 413, description = "Body too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "capture"
)]
pub async fn capture_webhook(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<CaptureResponse>, ApiError> {
    handle_capture(&state, None, request).await
}

/// Capture a webhook scoped to a UID (any HTTP method)
#[utoipa::path(
    post,
    path = "/api/webhook/{uid}",
    params(
        ("uid" = String, Path, description = "8-14 alphanumeric characters")
    ),
    request_body(content = String, description = "Arbitrary payload. Every HTTP method is accepted."),
    responses(
        (status = 200, description = "Webhook recorded", body = CaptureResponse),
        (status = 400, description = "Invalid UID", body = ErrorResponse),
        (status = 413, description = "Body too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "capture"
)]
pub async fn capture_webhook_for_uid(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    request: Request,
) -> Result<Json<CaptureResponse>, ApiError> {
    // Reject before any storage access
    let uid = Uid::parse(uid).map_err(|e| {
        debug!("Rejected capture: {}", e);
        failure(StatusCode::BAD_REQUEST, INVALID_UID_MESSAGE)
    })?;

    handle_capture(&state, Some(uid), request).await
}

async fn handle_capture(
    state: &AppState,
    uid: Option<Uid>,
    request: Request,
) -> Result<Json<CaptureResponse>, ApiError> {
    state.engine.expire().await.map_err(|e| {
        error!("Retention sweep failed during capture: {}", e);
        failure(StatusCode::INTERNAL_SERVER_ERROR, CAPTURE_FAILED_MESSAGE)
    })?;

    let new_request = capture::capture_request(request, uid, state.max_body_bytes)
        .await
        .map_err(|e| match e {
            CaptureError::Body(_) => {
                warn!("Rejected capture: {}", e);
                failure(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
            }
            CaptureError::Headers(_) => {
                error!("Failed to capture request: {}", e);
                failure(StatusCode::INTERNAL_SERVER_ERROR, CAPTURE_FAILED_MESSAGE)
            }
        })?;

    let uid = new_request.uid.as_ref().map(Uid::to_string);
    let method = new_request.method.clone();

    let id = state.ingest.record(new_request).await.map_err(|e| {
        error!("Failed to record webhook: {}", e);
        failure(StatusCode::INTERNAL_SERVER_ERROR, CAPTURE_FAILED_MESSAGE)
    })?;

    info!("Captured {} webhook {} (uid={:?})", method, id, uid);

    Ok(Json(CaptureResponse {
        success: true,
        message: "Webhook received".to_string(),
        id,
        uid,
    }))
}

/// List captured requests in a time window, newest first
#[utoipa::path(
    get,
    path = "/api/logs",
    params(
        ("minutes" = Option<u32>, Query, description = "Lookback window in minutes (default: 30). `minutesAgo` is accepted as an alias"),
        ("uid" = Option<String>, Query, description = "Only return requests captured for this UID")
    ),
    responses(
        (status = 200, description = "Captured requests", body = LogsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "logs"
)]
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<LogsResponse>, ApiError> {
    let query = LogsQuery::from_pairs(pairs);
    debug!("Listing captured requests: {:?}", query);

    let rows = state
        .engine
        .query(query.window_minutes(), query.uid())
        .await
        .map_err(|e| {
            error!("Failed to fetch webhooks: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED_MESSAGE)
        })?;

    let data: Vec<CapturedRequest> = rows.into_iter().map(CapturedRequest::from).collect();
    let count = data.len();

    Ok(Json(LogsResponse {
        success: true,
        data,
        count,
    }))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (status, label) = match state.storage.ping().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// OpenAPI document for this API
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

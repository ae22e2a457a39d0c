use crate::error::{ApiError, ApiResult};
use crate::schemas::{AppState, ErrorResponse, HealthResponse};
use axum::{extract::State, response::Json};
use tracing::{instrument, warn};

/// Health check endpoint
///
/// Answers 503 when the store does not respond to a ping.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and store are reachable", body = HealthResponse),
        (status = 503, description = "Store is unreachable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    if let Err(e) = state.db.ping().await {
        warn!("Database ping failed: {}", e);
        return Err(ApiError::Unavailable("Database is unreachable".to_string()));
    }

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: "connected".to_string(),
    }))
}

use crate::schemas::ErrorResponse;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use sea_orm::{DbErr, SqlErr};
use tracing::{error, warn};

/// Application-level error type for HTTP handlers.
///
/// Every variant is rendered as an [`ErrorResponse`] body with a matching
/// status code, so handlers can simply propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested row does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request was well-formed HTTP but its content is invalid.
    #[error("{0}")]
    Validation(String),

    /// The write would duplicate an existing row.
    #[error("{0}")]
    Conflict(String),

    /// The path exists but does not accept the request method.
    #[error("{0}")]
    MethodNotAllowed(String),

    /// The store cannot be reached.
    #[error("{0}")]
    Unavailable(String),

    /// Connection or query failure reported by the store.
    #[error("Database error: {0}")]
    Store(#[from] DbErr),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(entity: &str, id: i32) -> Self {
        Self::NotFound(format!("{entity} with id {id} not found"))
    }

    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            Self::MethodNotAllowed(msg) => {
                (StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED", msg.clone())
            }
            Self::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", msg.clone())
            }
            Self::Store(err) => classify_db_error(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            status: status.as_u16(),
            success: false,
        };

        (status, Json(body)).into_response()
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - Unique constraint violations map to 409.
/// - Foreign key violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_db_error(err: &DbErr) -> (StatusCode, &'static str, String) {
    if let DbErr::RecordNotFound(msg) = err {
        return (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone());
    }

    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            warn!("Unique constraint violated: {}", detail);
            (
                StatusCode::CONFLICT,
                "CONFLICT",
                "Favourite already exists".to_string(),
            )
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            warn!("Foreign key constraint violated: {}", detail);
            (
                StatusCode::BAD_REQUEST,
                "INVALID_REFERENCE",
                "Referenced entity does not exist".to_string(),
            )
        }
        _ => {
            error!(error = %err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

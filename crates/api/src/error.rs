//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ordering::{ErrorCategory, OrderError};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client, rejected before reaching the order service.
    BadRequest(String),
    /// Failure reported by the order service.
    Order(OrderError),
}

/// Maps a downstream category to its HTTP status.
///
/// Every category has exactly one status. `Unknown` and anything without a
/// closer match is a server error.
pub fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::NotFound => StatusCode::NOT_FOUND,
        ErrorCategory::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorCategory::AlreadyExists => StatusCode::CONFLICT,
        ErrorCategory::PermissionDenied => StatusCode::FORBIDDEN,
        ErrorCategory::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorCategory::FailedPrecondition => StatusCode::PRECONDITION_FAILED,
        ErrorCategory::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        ErrorCategory::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCategory::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Order(err) => {
                let status = status_for(err.category());
                if status.is_server_error() {
                    tracing::error!(error = %err, status = status.as_u16(), "order request failed");
                }
                (status, err.to_string())
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        ApiError::Order(err)
    }
}

//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use account_core::error::{AppError, ErrorKind};

/// Message returned for every server-side failure.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Handler-facing error: any [`AppError`] converted for the wire.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::DuplicateEmail => StatusCode::CONFLICT,
        ErrorKind::InvalidCredentials
        | ErrorKind::InvalidRefreshToken
        | ErrorKind::InvalidAccessToken
        | ErrorKind::ExpiredAccessToken => StatusCode::UNAUTHORIZED,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Cancelled => StatusCode::REQUEST_TIMEOUT,
        ErrorKind::Signing
        | ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);

        let body = if err.kind.is_client_error() {
            ApiErrorResponse {
                error: err.kind.to_string(),
                message: err.message,
            }
        } else {
            tracing::error!(kind = %err.kind, error = ?err, "Internal server error");
            ApiErrorResponse {
                error: "INTERNAL_ERROR".to_string(),
                message: INTERNAL_MESSAGE.to_string(),
            }
        };

        (status, Json(body)).into_response()
    }
}

//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps field invocation errors to HTTP status codes with JSON bodies.
//!
//! Failed *validation* is not an error here: it is a normal 200 response
//! carrying an envelope with `valid: false`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vfield_core::FieldError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown field (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request body is not an argument object (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::UnknownField(_) => Self::NotFound(err.to_string()),
            FieldError::Resolver { .. } => Self::Internal(err.to_string()),
        }
    }
}

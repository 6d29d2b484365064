// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Login or registration rejected by the backend. Always surfaced to the
    /// caller; the session is left clean.
    #[error("Invalid credentials: {0}")]
    Credentials(String),

    /// The backend answered 401/403 to an authenticated request: the token is
    /// semantically invalid or the principal no longer exists.
    #[error("Session rejected by backend (HTTP {0})")]
    SessionRejected(u16),

    /// No response received at all (connect failure, timeout). Ambiguous:
    /// never treated as proof the session is invalid.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a status we cannot positively interpret
    /// (5xx, unexpected 4xx).
    #[error("Unexpected backend status: HTTP {0}")]
    UnexpectedStatus(u16),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Credentials(msg) => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                Some(msg.clone()),
            ),
            AppError::SessionRejected(_) => (StatusCode::UNAUTHORIZED, "session_invalid", None),
            AppError::Network(msg) => {
                tracing::warn!(error = %msg, "Backend unreachable");
                (StatusCode::BAD_GATEWAY, "backend_unreachable", None)
            }
            AppError::UnexpectedStatus(code) => (
                StatusCode::BAD_GATEWAY,
                "backend_error",
                Some(format!("HTTP {code}")),
            ),
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Session storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl AppError {
    /// True for failures that prove the session is invalid (as opposed to
    /// transient transport problems).
    pub fn is_hard_session_failure(&self) -> bool {
        matches!(
            self,
            AppError::SessionRejected(_) | AppError::UnexpectedStatus(_)
        )
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

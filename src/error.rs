use axum::{
    http::{header::ALLOW, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::{MSG_METHOD_NOT_SUPPORTED, MSG_MISSING_GREETING, MSG_NOT_FOUND, MSG_STORE_FAILED};
use crate::storage::StorageError;

/// Methods served on `/greeting/{key}`
pub const ALLOWED_METHODS: &str = "GET, POST";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body is not a valid greeting payload; carries the parser message
    #[error("{0}")]
    MalformedBody(String),

    #[error("{}", MSG_MISSING_GREETING)]
    MissingGreeting,

    #[error("Failed to read greeting {key}: {source}")]
    Read { key: String, source: StorageError },

    #[error("Failed to store greeting {key}: {source}")]
    Write { key: String, source: StorageError },

    #[error("Method {0} not supported")]
    MethodNotAllowed(Method),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MalformedBody(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            AppError::MissingGreeting => {
                (StatusCode::BAD_REQUEST, MSG_MISSING_GREETING).into_response()
            }
            AppError::Read { ref source, .. } => {
                // Storage detail stays in the logs; callers only learn there is nothing to show
                if matches!(source, StorageError::NotFound(_)) {
                    tracing::info!(error = %self, "Greeting not found");
                } else {
                    tracing::error!(error = %self, "Greeting lookup failed");
                }
                (StatusCode::NOT_FOUND, MSG_NOT_FOUND).into_response()
            }
            AppError::Write { .. } => {
                tracing::error!(error = %self, "Greeting write failed");
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_STORE_FAILED).into_response()
            }
            AppError::MethodNotAllowed(ref method) => {
                tracing::debug!(method = %method, "Rejected unsupported method");
                (
                    StatusCode::METHOD_NOT_ALLOWED,
                    [(ALLOW, HeaderValue::from_static(ALLOWED_METHODS))],
                    MSG_METHOD_NOT_SUPPORTED,
                )
                    .into_response()
            }
        }
    }
}

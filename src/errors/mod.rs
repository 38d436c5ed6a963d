//! Unified error handling with consistent API response envelope.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::engine::EngineError;

/// Consistent JSON envelope for all calculation responses.
///
/// Successful responses carry `data`; failed ones carry `error`, `code` and,
/// when the engine reported something, `details`. Never both.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
            details: None,
        })
    }

    /// Wrap an error in the envelope.
    pub fn error(code: &str, message: &str, details: Option<String>) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
            code: Some(code.to_string()),
            details,
        })
    }
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Calculation failed: {details}")]
    ExecutionFailed { details: String },

    #[error("Calculation timed out")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Check if this error was caused by the request rather than the engine.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Timeout(_) => AppError::Timeout,
            EngineError::Failed { stderr, .. } => AppError::ExecutionFailed { details: stderr },
            // Launch and pipe failures carry no stderr; the error text is the diagnostic.
            other @ (EngineError::Spawn { .. } | EngineError::Io(_)) => AppError::ExecutionFailed {
                details: other.to_string(),
            },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None),
            AppError::ExecutionFailed { details } => {
                tracing::warn!(details = %details, "Chart engine failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXECUTION_FAILED",
                    "Calculation failed".to_string(),
                    Some(details),
                )
            }
            AppError::Timeout => {
                tracing::error!("Chart engine timed out");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TIMEOUT",
                    "Calculation timed out".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg, None)
            }
        };

        (status, ApiResponse::<()>::error(code, &message, details)).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::generator::GenerationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is a recoverable, caller-visible condition. None of them are fatal
/// to the process, and the engine never retries on the caller's behalf.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Field '{field_key}' is not a generable field of template '{template_name}'")]
    InvalidField {
        field_key: String,
        template_name: String,
    },

    #[error("Generation already in progress for field '{0}'")]
    AlreadyInProgress(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code carried in the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidField { .. } => "INVALID_FIELD",
            AppError::AlreadyInProgress(_) => "GENERATION_IN_PROGRESS",
            AppError::GenerationFailed(_) => "GENERATION_FAILED",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidField { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::AlreadyInProgress(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::GenerationFailed(e) => {
                tracing::warn!("Generation error: {e}");
                // Permanent failures need a configuration change before a retry can succeed.
                let status = if e.is_transient() {
                    StatusCode::BAD_GATEWAY
                } else {
                    StatusCode::BAD_REQUEST
                };
                (status, self.to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

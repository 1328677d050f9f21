use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is recoverable: the service keeps serving after any of them.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Validation(String),

    #[error("Generation request failed: {0}")]
    Transport(String),

    #[error("Could not parse the advisory response: {0}")]
    Parse(String),

    #[error("Could not render the advisory: {0}")]
    Shape(String),

    #[error("Another submission is still being processed")]
    Busy,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Parse(_) | AppError::Shape(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Busy => StatusCode::CONFLICT,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Transport(_) => "TRANSPORT_ERROR",
            AppError::Parse(_) => "PARSE_ERROR",
            AppError::Shape(_) => "SHAPE_ERROR",
            AppError::Busy => "BUSY",
        }
    }

    /// The single message shown to the user for this error.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => AppError::Configuration(err.to_string()),
            other => AppError::Transport(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        match &self {
            AppError::Transport(msg) => tracing::error!("Transport error: {msg}"),
            AppError::Configuration(msg) => tracing::error!("Configuration error: {msg}"),
            _ => {}
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.user_message()
            }
        }));

        (status, body).into_response()
    }
}

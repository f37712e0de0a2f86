//! Error types for salesboard-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use salesboard_core::{CoreError, DefaultErrorLogger, ErrorContext, ErrorLogger};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    InternalError { message: String },
}

impl ApiError {
    /// Log a core error and turn it into a response-ready error
    pub fn from_core(error: CoreError, context: &ErrorContext) -> Self {
        DefaultErrorLogger.log_error(&error, context);
        if error.is_client_error() {
            ApiError::BadRequest {
                message: error.to_string(),
            }
        } else {
            ApiError::InternalError {
                message: format!("Failed to {}: {}", context.operation, error),
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

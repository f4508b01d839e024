//! HTTP error handling and response types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::db::repository::RepositoryError;
use crate::models::FieldError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Request could not be read (malformed JSON, bad path parameter)
    BadRequest(String),
    /// Request was well-formed but a field failed validation
    Validation { message: String, field: Option<String> },
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Validation { message, field } => {
                let mut body = ApiError::new("VALIDATION_ERROR", message);
                if let Some(field) = field {
                    body = body.with_details(format!("field={}", field));
                }
                (StatusCode::UNPROCESSABLE_ENTITY, body)
            }
            AppError::Repository(e) => {
                let msg = e.to_string();
                match e {
                    RepositoryError::ValidationError { context, .. } => {
                        let mut body = ApiError::new("VALIDATION_ERROR", msg);
                        if let Some(details) = context.details {
                            body = body.with_details(details);
                        }
                        (StatusCode::UNPROCESSABLE_ENTITY, body)
                    }
                    RepositoryError::ConnectionError { .. } => {
                        warn!(error = %msg, "store unavailable");
                        (
                            StatusCode::SERVICE_UNAVAILABLE,
                            ApiError::new("STORE_UNAVAILABLE", msg),
                        )
                    }
                    _ => {
                        error!(error = %msg, "repository error");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ApiError::new("REPOSITORY_ERROR", msg),
                        )
                    }
                }
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        AppError::Validation {
            message: err.to_string(),
            field: Some(err.field().to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

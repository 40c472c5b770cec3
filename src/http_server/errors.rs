//! # API Errors
//!
//! Maps directory errors onto HTTP status codes and JSON bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

use crate::service::ServiceError;

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request body was not a JSON object
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(err) => match err {
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::Conflict { .. } => StatusCode::BAD_REQUEST,
                ServiceError::ResetUnavailable => StatusCode::BAD_REQUEST,
                ServiceError::NotFound => StatusCode::NOT_FOUND,
                ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn body(&self) -> Value {
        match self {
            ApiError::InvalidBody(reason) => json!({
                "success": false,
                "message": "Invalid request body",
                "error": reason,
            }),
            ApiError::Service(ServiceError::Validation(errors)) => json!({
                "success": false,
                "message": "Validation Error",
                "errors": errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>(),
                "fieldErrors": errors,
            }),
            ApiError::Service(ServiceError::Conflict { field, message }) => json!({
                "success": false,
                "message": message,
                "field": field,
            }),
            ApiError::Service(ServiceError::Internal(reason)) => json!({
                "success": false,
                "message": "Server Error",
                "error": reason,
            }),
            ApiError::Service(other) => json!({
                "success": false,
                "message": other.to_string(),
            }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Service(ServiceError::Internal(reason)) = &self {
            tracing::error!(error = %reason, "request failed");
        }
        (self.status_code(), Json(self.body())).into_response()
    }
}

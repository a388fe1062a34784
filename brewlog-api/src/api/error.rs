//! HTTP error responses
//!
//! Every failure is rendered as the JSON envelope
//! `{"success": false, "error": ..., "details"?: [...]}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Error type returned by all API handlers
#[derive(Debug)]
pub enum ApiError {
    /// Request body failed validation; details list the individual problems
    Validation(Vec<String>),
    /// Malformed or out-of-range request parameter
    BadRequest(String),
    /// Missing or invalid session
    Unauthorized(String),
    /// Caller may not access this resource
    Forbidden(String),
    NotFound(String),
    Database(String),
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(details) => json!({
                "success": false,
                "error": "Invalid request data",
                "details": details,
            }),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => json!({
                "success": false,
                "error": msg,
            }),
            ApiError::Database(msg) | ApiError::Internal(msg) => {
                error!("Request failed: {}", msg);
                json!({
                    "success": false,
                    "error": "Internal server error",
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<brewlog_common::Error> for ApiError {
    fn from(err: brewlog_common::Error) -> Self {
        use brewlog_common::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::NotAuthorized(msg) => ApiError::Forbidden(msg),
            Error::AlreadyExists(msg) => ApiError::BadRequest(msg),
            Error::Database(e) => ApiError::Database(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Database(err.to_string())
    }
}

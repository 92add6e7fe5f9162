//! Error taxonomy for the observatory service.
//!
//! Every storage and service function returns `Result<T, ApiError>`. The
//! `ResponseError` impl turns each variant into its HTTP status and a
//! `{"success": false, "error": ...}` body. Storage failures are logged with
//! their detail and reported to the caller with a generic message only.

use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing required input.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Authentication required.")]
    AuthenticationRequired,
    /// The caller is authenticated but does not own the resource.
    #[error("{0}")]
    Forbidden(String),
    /// A child resource exists but does not belong to the stated parent.
    #[error("{0}")]
    Mismatch(String),
    #[error("SQLite error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("Storage worker error: {0}")]
    Worker(#[from] BlockingError),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn mismatch(msg: impl Into<String>) -> Self {
        ApiError::Mismatch(msg.into())
    }

    /// The message sent to the caller. Internal failures never expose their detail.
    fn public_message(&self) -> String {
        match self {
            ApiError::Storage(_) | ApiError::Worker(_) => {
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Mismatch(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Storage(_) | ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        HttpResponse::build(status).json(json!({
            "success": false,
            "error": self.public_message(),
        }))
    }
}

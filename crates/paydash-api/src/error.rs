//! Error types for paydash-api
//!
//! Each variant renders as one of the contract's error bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use paydash_core::contract::{InternalErrorBody, NotFoundBody, ValidationErrorBody};
use paydash_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Method {method} not allowed on {resource}")]
    MethodNotAllowed { method: String, resource: String },

    /// The message is logged, never sent to the client
    #[error("Internal server error")]
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation { message, field } => ApiError::Validation { message, field },
            CoreError::InvalidFormat { message } => ApiError::Validation { message, field: None },
            CoreError::Internal { message } => ApiError::Internal { message },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation { message, field } => {
                log::warn!("Rejected request: {} (field: {:?})", message, field);
                (status, Json(ValidationErrorBody { message, field })).into_response()
            }
            // Message-only body, same shape as not-found
            ApiError::NotFound { .. } | ApiError::MethodNotAllowed { .. } => {
                log::debug!("{}", self);
                (status, Json(NotFoundBody { message: self.to_string() })).into_response()
            }
            ApiError::Internal { ref message } => {
                log::error!("Internal error: {}", message);
                (status, Json(InternalErrorBody { message: self.to_string() })).into_response()
            }
        }
    }
}

//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::ApiError;
use crate::models::TransitionError;
use crate::pricing::responses::ErrorResponse;
use crate::pricing::ValidationError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid status change: {0}")]
    Transition(#[from] TransitionError),

    #[error("Hotel API error: {0}")]
    Api(#[from] ApiError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Transition(_) => StatusCode::CONFLICT,
            AppError::Api(ApiError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Api(_) => StatusCode::BAD_GATEWAY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Transition(_) => "invalid_transition",
            AppError::Api(ApiError::NotFound { .. }) => "not_found",
            AppError::Api(_) => "upstream_error",
            AppError::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, details) = match &self {
            AppError::Validation(e) => (e.to_string(), Some(json!({ "field": e.field() }))),
            AppError::Transition(e) => (e.to_string(), None),
            AppError::Api(e @ ApiError::NotFound { .. }) => (e.to_string(), None),
            AppError::Api(e) => {
                tracing::error!("Hotel API error: {}", e);
                ("Hotel API request failed".to_string(), None)
            }
            AppError::BadRequest(msg) => (msg.clone(), None),
        };

        let body = ErrorResponse {
            error_type: self.error_type().to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

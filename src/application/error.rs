use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::applications::ApplicationError;
use crate::services::enquiries::EnquiryError;

/// Message shown whenever a storage failure is hidden from the caller
pub const TRY_AGAIN_MESSAGE: &str = "Something went wrong on our side. Please try again.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Upstream service error: {0}")]
    BadGateway(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error(transparent)]
    Enquiry(#[from] EnquiryError),
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String, Option<String>) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, TRY_AGAIN_MESSAGE.to_string(), None)
            }
            AppError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone(), None)
            }
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg.clone(), None),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, TRY_AGAIN_MESSAGE.to_string(), None)
            }
            AppError::Jwt(_) => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired session".to_string(),
                None,
            ),
            AppError::Application(e) => application_status(e),
            AppError::Enquiry(EnquiryError::Validation { field, message }) => {
                (StatusCode::BAD_REQUEST, message.clone(), Some(field.to_string()))
            }
            AppError::Enquiry(EnquiryError::Delivery(reason)) => {
                tracing::warn!(reason = %reason, "Enquiry could not be delivered");
                (StatusCode::BAD_GATEWAY, self.to_string(), None)
            }
        }
    }
}

fn application_status(error: &ApplicationError) -> (StatusCode, String, Option<String>) {
    match error {
        ApplicationError::Validation { field, message } => {
            (StatusCode::BAD_REQUEST, message.clone(), Some(field.to_string()))
        }
        ApplicationError::DuplicateAccount
        | ApplicationError::DuplicatePending
        | ApplicationError::DuplicateApproved
        | ApplicationError::InvalidTransition { .. } => {
            (StatusCode::CONFLICT, error.to_string(), None)
        }
        ApplicationError::InvalidOrExpiredCode => {
            (StatusCode::BAD_REQUEST, error.to_string(), None)
        }
        ApplicationError::NotFound => (StatusCode::NOT_FOUND, error.to_string(), None),
        ApplicationError::Store(e) => {
            tracing::error!("Application store error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, TRY_AGAIN_MESSAGE.to_string(), None)
        }
        ApplicationError::Security(msg) => {
            tracing::error!("Security error: {}", msg);
            (StatusCode::INTERNAL_SERVER_ERROR, TRY_AGAIN_MESSAGE.to_string(), None)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail, field) = self.status_and_message();
        (status, Json(ErrorResponse { detail, field })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

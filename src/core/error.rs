use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Upload failed: {0}")]
    UploadFailure(String),

    #[error("Query failed: {0}")]
    QueryFailure(String),

    #[error("Insert failed: {0}")]
    InsertFailure(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::UploadFailure(ref msg) => {
                tracing::error!("Upload failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to store attached document".to_string(),
                    Some(vec![msg.clone()]),
                )
            }
            AppError::QueryFailure(ref msg) => {
                tracing::error!("Query failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to load equipment records".to_string(),
                    None,
                )
            }
            AppError::InsertFailure(ref msg) => {
                tracing::error!("Insert failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to save equipment record".to_string(),
                    None,
                )
            }
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

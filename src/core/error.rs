use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::locations::validator::FieldViolations;
use crate::shared::types::ErrorBody;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid IP address: {0}")]
    InvalidIp(String),

    #[error("File access error: {0}")]
    FileAccess(String),

    #[error("Validation failed")]
    Validation(FieldViolations),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec!["500 Internal Server Error".to_string()],
                )
            }
            AppError::NotFound(ref msg) => {
                tracing::debug!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, vec!["404 Not Found".to_string()])
            }
            AppError::InvalidIp(ref ip) => {
                tracing::debug!("Invalid IP address: {}", ip);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    vec!["422 Invalid IP Address".to_string()],
                )
            }
            AppError::FileAccess(ref path) => {
                tracing::warn!("Cannot open import source: {}", path);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    vec!["422 No such file or directory".to_string()],
                )
            }
            AppError::Validation(ref violations) => {
                (StatusCode::UNPROCESSABLE_ENTITY, violations.to_messages())
            }
        };

        (status, Json(ErrorBody { errors })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

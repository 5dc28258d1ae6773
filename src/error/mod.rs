//! Error handling module

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::wireguard::encoding::KeyDecodeError;
use crate::wireguard::validation::ValidationError;
use crate::wireguard::KeyGenError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid key: {0}")]
    InvalidKey(#[from] KeyDecodeError),

    #[error("Invalid tunnel parameters")]
    InvalidParameters(Vec<ValidationError>),

    #[error("Key generation failed: {0}")]
    KeyGeneration(#[from] KeyGenError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidKey(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::InvalidParameters(_) => {
                (StatusCode::BAD_REQUEST, "Invalid tunnel parameters".to_string())
            }
            AppError::KeyGeneration(KeyGenError::RandomnessUnavailable(e)) => {
                tracing::error!("Secure randomness source unavailable: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "secure randomness source unavailable".to_string(),
                )
            }
        };

        let mut body = serde_json::json!({
            "error": message,
            "status": status.as_u16()
        });

        if let AppError::InvalidParameters(errors) = &self {
            body["errors"] = serde_json::json!(errors);
        }

        (status, Json(body)).into_response()
    }
}

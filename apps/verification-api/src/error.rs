//! Error types for the verification API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use review_queue::StoreError;
use serde_json::json;
use thiserror::Error;

use crate::api::CASE_NOT_FOUND;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Only image files (JPG, PNG) and PDFs are supported, got {0}")]
    InvalidFileType(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Case not found: {0}")]
    CaseNotFound(String),

    #[error("Case store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidFileType(_) => (
                StatusCode::BAD_REQUEST,
                "Only image files (JPG, PNG) and PDFs are supported".to_string(),
            ),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::CaseNotFound(_) => (StatusCode::NOT_FOUND, CASE_NOT_FOUND.to_string()),
            ApiError::Store(e) => {
                tracing::error!("Case store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Case store error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

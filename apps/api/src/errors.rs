use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

const UPLOAD_TOO_LARGE: &str = "Upload exceeds the maximum allowed size";

/// Request-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Per-file failures never use this type; they are records in a 200 response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                tracing::warn!("Rejected oversized upload: {e}");
                (StatusCode::PAYLOAD_TOO_LARGE, UPLOAD_TOO_LARGE.to_string())
            }
            AppError::Multipart(e) => {
                tracing::warn!("Rejected multipart body: {e}");
                (e.status(), self.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

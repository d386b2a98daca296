//! Error types for the wording server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use doc_extract::ExtractError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("No file part in the request")]
    NoFile,

    #[error("No file selected")]
    EmptyFilename,

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("File exceeds the {0} byte limit")]
    FileTooLarge(usize),

    #[error("Document decoding failed: {0}")]
    Decode(#[from] ExtractError),

    #[error("Processing timeout after {0}ms")]
    Timeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ServerError::NoFile => (
                StatusCode::BAD_REQUEST,
                "NO_FILE",
                "No file part in the request".to_string(),
            ),
            ServerError::EmptyFilename => (
                StatusCode::BAD_REQUEST,
                "EMPTY_FILENAME",
                "No file selected".to_string(),
            ),
            ServerError::UnsupportedFileType(name) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_FILE_TYPE",
                format!("Unsupported file type '{}'. Only PDF and DOCX are accepted", name),
            ),
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            ServerError::FileTooLarge(limit) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "FILE_TOO_LARGE",
                format!("File too large. Maximum size is {} bytes", limit),
            ),
            // Details of server-side failures stay in the logs
            ServerError::Decode(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PROCESSING_ERROR",
                "The document could not be processed".to_string(),
            ),
            ServerError::Timeout(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TIMEOUT",
                "Document processing timed out".to_string(),
            ),
            ServerError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            error!("{} ({})", self, code);
        }

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

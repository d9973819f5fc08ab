use crate::common::response::ApiError;
use crate::infrastructure::engine::EngineError;
use crate::infrastructure::storage::StorageError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    /// Bad MIME type, oversized file, malformed action or parameters.
    #[error("{0}")]
    Validation(String),

    #[error("Transform failed: {0}")]
    Transform(#[from] EngineError),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl JobError {
    pub fn status(&self) -> StatusCode {
        match self {
            JobError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the client gets to see. Engine and storage details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            JobError::Validation(msg) => msg.clone(),
            JobError::Transform(_) => "Video processing failed".to_string(),
            JobError::Storage(_) => "Failed to store processed video".to_string(),
            JobError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for JobError {
    fn into_response(self) -> Response {
        ApiError(self.client_message(), self.status()).into_response()
    }
}

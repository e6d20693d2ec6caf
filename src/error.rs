//! API error type shared by the route handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::services::task_store::TaskStoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Upload form is missing or unreadable.
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    #[error("File too large. Max {max_bytes} bytes allowed")]
    PayloadTooLarge { max_bytes: usize },

    #[error("Unsupported document format")]
    UnsupportedMediaType,

    #[error("Task {0} not found")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest { code, .. } => *code,
            Self::PayloadTooLarge { .. } => "FILE_TOO_LARGE",
            Self::UnsupportedMediaType => "UNSUPPORTED_MEDIA",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "SERVER_ERROR",
        }
    }

    /// Internal details stay in the logs.
    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "Server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<TaskStoreError> for ApiError {
    fn from(err: TaskStoreError) -> Self {
        match err {
            TaskStoreError::NotFound(id) => Self::NotFound(id.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let internal_message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, code = code, error = %internal_message, "Server error");
        } else {
            tracing::warn!(status = %status, code = code, error = %internal_message, "Client error");
        }

        let body = serde_json::json!({
            "ok": false,
            "error": self.client_message(),
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}

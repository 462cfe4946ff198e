//! Error types for the notes server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::ai::AiError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not logged in")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("AI service error: {0}")]
    Ai(#[from] AiError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Ai(e) => e.status(),
            AppError::Database(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the user. Server-side failures are logged and
    /// replaced with a generic message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::Unauthorized => "Please log in first.".to_string(),
            AppError::Ai(e @ (AiError::Unavailable(_) | AiError::InvalidResponse(_))) => {
                tracing::error!("AI service failure: {}", e);
                "AI service unavailable".to_string()
            }
            AppError::Ai(e) => e.to_string(),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "A storage error occurred".to_string()
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {}", e);
                "A storage error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_type = match &self {
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unauthorized => "unauthorized",
            AppError::Conflict(_) => "conflict",
            AppError::Ai(_) => "ai_error",
            AppError::Database(_) | AppError::Serialization(_) => "storage_error",
            AppError::Internal(_) => "internal_error",
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.user_message(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Ai(AiError::Timeout).status(),
            StatusCode::REQUEST_TIMEOUT
        );
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = AppError::Internal("secret path /etc".into());
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_ai_transport_details_are_hidden() {
        let err = AppError::Ai(AiError::Unavailable(
            "error sending request for url (http://10.0.0.5:9000/summarize)".into(),
        ));
        assert_eq!(err.user_message(), "AI service unavailable");

        let err = AppError::Ai(AiError::Rejected {
            status: 400,
            detail: "Content cannot be empty".into(),
        });
        assert_eq!(err.user_message(), "Content cannot be empty");
    }
}

//! Error handling for the feed API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed data: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<deck_core::LoadError> for ApiError {
    fn from(e: deck_core::LoadError) -> Self {
        Self::Parse(e.to_string())
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Parse(_) => (StatusCode::INTERNAL_SERVER_ERROR, "malformed_data"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let error = ApiError::NotFound("vocab.json".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_parse_error_status() {
        let error = ApiError::Parse("expected array".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_io_error_status() {
        let error = ApiError::from(std::io::Error::other("disk gone"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_load_error_conversion() {
        let error = ApiError::from(deck_core::LoadError::parse("vocab.json", "eof"));
        assert!(matches!(error, ApiError::Parse(_)));
        assert_eq!(
            error.to_string(),
            "Malformed data: unparsable vocab.json: eof"
        );

        let error = ApiError::from(deck_core::LoadError::fetch("latest.json", "timeout"));
        assert!(matches!(error, ApiError::Parse(_)));
    }

    #[test]
    fn test_error_display_not_found() {
        let error = ApiError::NotFound("vocab.json".to_string());
        assert_eq!(error.to_string(), "Not found: vocab.json");
    }
}

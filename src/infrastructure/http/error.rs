//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, response) = match &self {
            ApiError::NotFound(msg) => {
                tracing::warn!(errno = errno::NOT_FOUND, error = %msg, "Resource not found");
                (
                    StatusCode::OK,
                    ErrorResponse::new(errno::NOT_FOUND, msg.clone()),
                )
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno = errno::BAD_REQUEST, error = %msg, "Bad request");
                (
                    StatusCode::OK,
                    ErrorResponse::new(errno::BAD_REQUEST, msg.clone()),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno = errno::INTERNAL_ERROR, error = %msg, "Internal server error");
                (
                    StatusCode::OK,
                    ErrorResponse::new(errno::INTERNAL_ERROR, msg.clone()),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(errno = errno::SERVICE_UNAVAILABLE, error = %msg, "Service unavailable");
                (
                    StatusCode::OK,
                    ErrorResponse::new(errno::SERVICE_UNAVAILABLE, msg.clone()),
                )
            }
        };

        (status, Json(response)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::UnreadablePackage(msg) => {
                ApiError::BadRequest(format!("Unreadable EPUB package: {}", msg))
            }
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::ExternalServiceError(msg) => ApiError::ServiceUnavailable(msg),
            ApplicationError::StorageError(msg) => ApiError::Internal(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_errors_use_envelope_with_http_ok() {
        let (status, json) = body_json(ApiError::NotFound("Book not found: 3".to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["errno"], errno::NOT_FOUND);
        assert_eq!(json["error"], "Book not found: 3");
        assert!(json["data"].is_null());
    }

    #[test]
    fn test_application_error_mapping() {
        assert!(matches!(
            ApiError::from(ApplicationError::not_found("Chapter", 7)),
            ApiError::NotFound(msg) if msg == "Chapter not found: 7"
        ));
        assert!(matches!(
            ApiError::from(ApplicationError::UnreadablePackage("x".to_string())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(ApplicationError::ExternalServiceError("down".to_string())),
            ApiError::ServiceUnavailable(_)
        ));
    }
}

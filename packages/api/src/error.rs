// ABOUTME: API error type with HTTP status mapping
// ABOUTME: Structured JSON error responses with machine-readable codes

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use plume_settings::{ServiceError, ValidationError};
use plume_storage::StorageError;

/// Main application error type that all handlers return
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Storage error")]
    Storage(#[from] StorageError),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => ApiError::Validation(e),
            ServiceError::Storage(e) => ApiError::Storage(e),
        }
    }
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl ApiError {
    /// Convert to HTTP status code and machine-readable error code
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(ValidationError::PayloadTooLarge { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE")
            }
            ApiError::Validation(ValidationError::UnsupportedMediaType(_)) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE")
            }
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        }
    }

    /// User-facing message, sanitized for external consumption
    fn to_user_message(&self) -> String {
        match self {
            ApiError::Validation(err) => err.to_string(),
            ApiError::BadRequest(msg) => format!("Malformed request: {}", msg),
            ApiError::Unauthorized => "Authentication required".to_string(),
            ApiError::Storage(_) => "Data storage error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status_code, error_code) = self.to_status_and_code();
        let user_message = self.to_user_message();

        // Log storage failures with full context but don't expose details
        match &self {
            ApiError::Storage(err) => {
                error!(
                    request_id = %request_id,
                    storage_error = %err,
                    "Storage system error"
                );
            }
            _ => {
                tracing::info!(
                    request_id = %request_id,
                    error_code = %error_code,
                    error = %self,
                    "API error response"
                );
            }
        }

        let error_response = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: error_code.to_string(),
                message: user_message,
            },
            request_id,
        };

        let mut response = Json(error_response).into_response();
        *response.status_mut() = status_code;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_settings::MAX_AVATAR_BYTES;

    #[test]
    fn test_payload_too_large_maps_to_413() {
        let error = ApiError::Validation(ValidationError::PayloadTooLarge {
            size: MAX_AVATAR_BYTES + 1,
            max: MAX_AVATAR_BYTES,
        });
        let (status, code) = error.to_status_and_code();
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(code, "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn test_unsupported_media_type_maps_to_415() {
        let error =
            ApiError::Validation(ValidationError::UnsupportedMediaType("image/png".into()));
        let (status, code) = error.to_status_and_code();
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(code, "UNSUPPORTED_MEDIA_TYPE");
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let (status, code) = ApiError::Unauthorized.to_status_and_code();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, "UNAUTHORIZED");
    }

    #[test]
    fn test_storage_error_message_is_sanitized() {
        let error = ApiError::Storage(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk path /var/secret/plume.db unavailable",
        )));
        let message = error.to_user_message();
        assert_eq!(message, "Data storage error");
        assert!(!message.contains("/var/secret"));
    }
}

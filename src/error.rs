use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ink_separation::{InputError, SeparationError};
use serde_json::json;
use thiserror::Error;

use crate::services::image_codec::CodecError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SeparationError> for ApiError {
    fn from(e: SeparationError) -> Self {
        match e {
            SeparationError::Input(input) => ApiError::Input(input),
            other => ApiError::Processing(other.to_string()),
        }
    }
}

impl From<CodecError> for ApiError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Decode(input) => ApiError::Input(input),
            other @ CodecError::Base64(_) => ApiError::BadRequest(other.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(e.body_text())
        } else {
            ApiError::BadRequest(e.body_text())
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("worker task failed: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) | ApiError::Input(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Processing(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_bad_request() {
        let error = ApiError::BadRequest("unknown method: sepia".to_string());
        assert_eq!(error.to_string(), "Bad request: unknown method: sepia");
    }

    #[test]
    fn test_api_error_from_input_error() {
        let error: ApiError = InputError::EmptyImage.into();
        assert_eq!(error.to_string(), "Invalid input: image has no pixels");
    }

    #[test]
    fn test_api_error_from_separation_error() {
        let input = SeparationError::Input(InputError::OutOfRange {
            field: "softness",
            value: 2.0,
            min: 0.0,
            max: 1.0,
        });
        match ApiError::from(input) {
            ApiError::Input(_) => {}
            other => panic!("Expected Input variant, got {other:?}"),
        }

        let processing = SeparationError::Processing {
            stage: ink_separation::Stage::ChannelBuild,
            reason: "mask size mismatch".to_string(),
        };
        match ApiError::from(processing) {
            ApiError::Processing(msg) => assert!(msg.contains("channel build")),
            other => panic!("Expected Processing variant, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_into_response_status_codes() {
        let response = ApiError::BadRequest("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Input(InputError::EmptyImage).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::PayloadTooLarge("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let response = ApiError::Processing("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError::Internal("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

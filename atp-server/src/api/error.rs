//! Error responses for API handlers

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use atp_common::api::ErrorResponse;

/// Handler errors
#[derive(Debug)]
pub enum ApiError {
    /// Core failure; `raw_text` echoes submitted text for manual correction
    Core {
        error: atp_common::Error,
        raw_text: Option<String>,
    },
    /// Request body was not valid JSON for the endpoint
    MalformedBody(String),
}

impl ApiError {
    pub fn with_raw_text(error: atp_common::Error, raw_text: String) -> Self {
        ApiError::Core {
            error,
            raw_text: Some(raw_text),
        }
    }
}

impl From<atp_common::Error> for ApiError {
    fn from(error: atp_common::Error) -> Self {
        ApiError::Core {
            error,
            raw_text: None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Core { error, raw_text } => {
                let status = if error.is_client_error() {
                    warn!("Request rejected: {}", error);
                    StatusCode::BAD_REQUEST
                } else {
                    error!("Request failed: {}", error);
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                let mut body = ErrorResponse::new(error.kind(), error.to_string());
                if let Some(text) = raw_text {
                    body = body.with_raw_text(text);
                }
                (status, body)
            }
            ApiError::MalformedBody(message) => {
                warn!("Malformed request body: {}", message);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("malformed_body", message),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

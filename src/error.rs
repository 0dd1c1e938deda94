use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorObject,
}

#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub code: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str, String),
    NotFound(&'static str, String),
    Conflict(&'static str, String),
    /// The booking backend failed or answered with something unusable.
    Upstream(&'static str, String),
}

impl ApiError {
    pub fn unknown_view(view: &str) -> Self {
        ApiError::NotFound(
            "UNKNOWN_VIEW",
            format!("no appointment view named '{view}'"),
        )
    }

    fn to_error_response(code: &str, message: &str) -> Json<ErrorResponse> {
        Json(ErrorResponse {
            error: ErrorObject {
                code: code.to_string(),
                message: message.to_string(),
            },
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(code, msg) => {
                (StatusCode::BAD_REQUEST, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::NotFound(code, msg) => {
                (StatusCode::NOT_FOUND, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::Conflict(code, msg) => {
                (StatusCode::CONFLICT, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::Upstream(code, msg) => {
                (StatusCode::BAD_GATEWAY, ApiError::to_error_response(code, &msg)).into_response()
            }
        }
    }
}

/// Failure talking to the booking backend.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("backend unreachable at {url}: {message}")]
    Transport { url: String, message: String },

    #[error("backend answered {status} for {url}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("unexpected payload from {url}: {message}")]
    Decode { url: String, message: String },
}

impl From<BackendError> for ApiError {
    fn from(e: BackendError) -> Self {
        tracing::error!(error = %e, "booking backend call failed");
        ApiError::Upstream("BACKEND_UNAVAILABLE", e.to_string())
    }
}

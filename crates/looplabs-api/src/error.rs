//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use looplabs_engine::EngineError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Too many sessions in progress")]
    Busy,

    #[error("Session failed: {0}")]
    Session(#[from] EngineError),

    #[error("An internal error occurred")]
    Redacted { code: Option<&'static str> },
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Swap internal details for a generic message unless `expose_internal`.
    pub fn redact(self, expose_internal: bool) -> Self {
        if expose_internal {
            return self;
        }
        let code = self.code();
        match self {
            ApiError::Session(_) => ApiError::Redacted { code },
            other => other,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Busy => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Session(_) | ApiError::Redacted { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::Session(e) => Some(e.kind()),
            ApiError::Busy => Some("busy"),
            ApiError::Redacted { code } => *code,
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = ErrorResponse {
            detail: self.to_string(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

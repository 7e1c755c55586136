//! Text service error types.

use thiserror::Error;

pub type AiResult<T> = Result<T, AiError>;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("OPENAI_API_KEY not set")]
    MissingApiKey,

    #[error("Text service disabled (offline mode)")]
    Offline,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty completion")]
    EmptyCompletion,

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AiError {
    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed(message.into())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AiError::MissingApiKey => "missing_api_key",
            AiError::Offline => "offline",
            AiError::RequestFailed(_) => "request_failed",
            AiError::InvalidResponse(_) | AiError::Json(_) => "invalid_response",
            AiError::EmptyCompletion => "empty_completion",
            AiError::Timeout(_) => "timeout",
            AiError::Network(_) => "network",
        }
    }
}

//! Pipeline error types.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that end a session.
///
/// Text-service and style problems never show up here; they degrade to
/// fallbacks inside the resolvers.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Render failed: {0}")]
    Render(#[from] looplabs_media::MediaError),

    #[error("Text service setup failed: {0}")]
    TextService(#[from] looplabs_ai::AiError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Artifact write failed: {0}")]
    ArtifactFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn artifact_failed(msg: impl Into<String>) -> Self {
        Self::ArtifactFailed(msg.into())
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Render(_) => "render",
            EngineError::TextService(_) => "text_service",
            EngineError::ConfigError(_) => "config",
            EngineError::ArtifactFailed(_) | EngineError::Io(_) | EngineError::Json(_) => "artifact",
        }
    }
}

//! Application state.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use looplabs_engine::{EngineConfig, EngineResult, Pipeline};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<Pipeline>,
    sessions: Arc<Semaphore>,
    /// Show internal error details in responses (off in production)
    expose_internal: bool,
}

impl AppState {
    /// State around an already-built pipeline.
    pub fn new(config: ApiConfig, pipeline: Pipeline) -> Self {
        let sessions = Arc::new(Semaphore::new(config.max_concurrent_sessions.max(1)));
        let expose_internal = !config.is_production();
        Self {
            expose_internal,
            config,
            pipeline: Arc::new(pipeline),
            sessions,
        }
    }

    /// State with the OpenAI-backed, FFmpeg-rendering pipeline.
    pub fn from_engine_config(config: ApiConfig, engine: EngineConfig) -> EngineResult<Self> {
        let pipeline = Pipeline::from_config(Arc::new(engine), false)?;
        Ok(Self::new(config, pipeline))
    }

    pub fn expose_internal(&self) -> bool {
        self.expose_internal
    }

    /// Claim a render slot without waiting.
    pub fn try_claim_session(&self) -> Option<OwnedSemaphorePermit> {
        self.sessions.clone().try_acquire_owned().ok()
    }
}

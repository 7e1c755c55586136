//! Content pack generation.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use looplabs_engine::SessionRequest;
use looplabs_models::{BuiltinStyle, CaptionResult, Manifest};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

fn default_style() -> String {
    BuiltinStyle::FALLBACK.as_str().to_string()
}

/// Body of `POST /generate`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(length(min = 1, max = 2000))]
    pub prompt: String,

    #[serde(default = "default_style")]
    #[validate(length(min = 1, max = 64))]
    pub style: String,

    /// Expand the prompt before concept resolution
    #[serde(default)]
    pub enrich: bool,
}

/// Result of one generated pack.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub session_id: String,
    pub output_dir: String,
    pub manifest: Manifest,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub thumbnail_created: bool,
}

/// Run one pipeline session and return what it produced.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    request.validate()?;
    if request.prompt.trim().is_empty() {
        return Err(ApiError::Validation("prompt: must not be blank".to_string()));
    }

    let Some(_permit) = state.try_claim_session() else {
        metrics::record_session_rejected();
        return Err(ApiError::Busy);
    };

    info!(style = %request.style, enrich = request.enrich, "Generate request accepted");

    let session = SessionRequest::new(request.prompt, request.style).with_enrich(request.enrich);
    let outcome = state
        .pipeline
        .run(&session)
        .await
        .map_err(|e| ApiError::from(e).redact(state.expose_internal()))?;

    let CaptionResult { caption, hashtags } = outcome.caption;
    Ok(Json(GenerateResponse {
        success: true,
        session_id: outcome.session_id.as_str().to_string(),
        output_dir: outcome.output_dir.display().to_string(),
        manifest: outcome.manifest,
        caption,
        hashtags,
        thumbnail_created: outcome.thumbnail_created,
    }))
}

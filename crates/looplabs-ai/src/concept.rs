//! Concept resolution: prompt in, visual parameters out.

use std::sync::Arc;

use tracing::{debug, warn};

use looplabs_models::{Motion, Rgb, SessionMetadata};

use crate::client::TextGenerator;
use crate::error::{AiError, AiResult};
use crate::types::CompletionRequest;

/// Instruction sent with every concept request.
pub fn concept_prompt(prompt: &str) -> String {
    format!(
        r#"Turn this idea into simple visual parameters for a short looping video.
Prompt: "{prompt}"
Reply in JSON with keys:
color (RGB list 0-255),
text (short overlay),
mood (string),
motion ('pulse', 'fade', or 'none'),
keywords (array of 3-5 words),
theme (1-2 words summary).
Keep it minimal, cinematic, and brand-friendly."#
    )
}

/// Concept used when the service gives nothing usable.
pub fn fallback_concept() -> SessionMetadata {
    SessionMetadata {
        color: Some(Rgb::new(0, 0, 255)),
        text: Some("LoopLabs".to_string()),
        motion: Some(Motion::None),
        mood: Some("neutral".to_string()),
        ..Default::default()
    }
}

/// Parse a concept response.
///
/// Anything that is not a JSON object is an error. Individual fields with
/// the wrong shape are dropped with a warning.
pub fn parse_concept(raw: &str) -> AiResult<SessionMetadata> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let (concept, issues) = SessionMetadata::from_json_value(value).map_err(AiError::invalid_response)?;
    for issue in issues {
        warn!(field = %issue.field, reason = %issue.reason, "Dropping malformed concept field");
    }
    Ok(concept)
}

/// Asks the text service for a concept, falling back on any failure.
#[derive(Clone)]
pub struct ConceptResolver {
    generator: Arc<dyn TextGenerator>,
}

impl ConceptResolver {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Resolve `prompt` to a concept. Never fails.
    pub async fn resolve(&self, prompt: &str) -> SessionMetadata {
        match self.try_resolve(prompt).await {
            Ok(concept) => {
                debug!(fields = ?concept.keys(), "Concept resolved");
                concept
            }
            Err(e) => {
                warn!(error = %e, "Could not resolve concept, using fallback");
                metrics::counter!("looplabs_text_fallbacks_total", "stage" => "concept", "reason" => e.kind())
                    .increment(1);
                fallback_concept()
            }
        }
    }

    async fn try_resolve(&self, prompt: &str) -> AiResult<SessionMetadata> {
        let request = CompletionRequest::json(concept_prompt(prompt));
        let raw = self.generator.complete(&request).await?;
        parse_concept(&raw)
    }
}

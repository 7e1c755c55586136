//! Optional prompt enrichment before concept resolution.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::TextGenerator;
use crate::error::{AiError, AiResult};
use crate::types::CompletionRequest;

pub const ENRICH_SYSTEM_PROMPT: &str = "You are LoopLabs AI Assistant. Expand short creative prompts into full cinematic descriptions for video generation, including visual mood, style, tone, transitions, and scene ideas.";

/// Rewrites a short prompt into a fuller description.
#[derive(Clone)]
pub struct PromptEnricher {
    generator: Arc<dyn TextGenerator>,
}

impl PromptEnricher {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Enriched prompt, or `prompt` unchanged if the service fails.
    pub async fn enrich(&self, prompt: &str) -> String {
        match self.try_enrich(prompt).await {
            Ok(enriched) => {
                debug!(chars = enriched.len(), "Prompt enriched");
                enriched
            }
            Err(e) => {
                warn!(error = %e, "Prompt enrichment failed, using raw prompt");
                metrics::counter!("looplabs_text_fallbacks_total", "stage" => "enrich", "reason" => e.kind())
                    .increment(1);
                prompt.to_string()
            }
        }
    }

    async fn try_enrich(&self, prompt: &str) -> AiResult<String> {
        let request = CompletionRequest::text(prompt).with_system(ENRICH_SYSTEM_PROMPT);
        let enriched = self.generator.complete(&request).await?;
        let enriched = enriched.trim();
        if enriched.is_empty() {
            return Err(AiError::EmptyCompletion);
        }
        Ok(enriched.to_string())
    }
}

//! Caption resolution: merged metadata in, caption and hashtags out.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use looplabs_models::{CaptionResult, SessionMetadata};

use crate::client::TextGenerator;
use crate::error::{AiError, AiResult};
use crate::types::CompletionRequest;

/// Instruction sent with every caption request.
pub fn caption_prompt(metadata: &SessionMetadata) -> String {
    format!(
        r#"Create a short, catchy Instagram caption (max 2 sentences) and 8-10 relevant hashtags.
Theme: {theme}
Mood: {mood}
Keywords: {keywords}
The style should sound natural and conversion-friendly.
Output JSON with keys: caption, hashtags (as list)."#,
        theme = metadata.theme.as_deref().unwrap_or("None"),
        mood = metadata.mood.as_deref().unwrap_or("None"),
        keywords = metadata.keywords_or_empty().join(", "),
    )
}

/// Parse a caption response.
///
/// `caption` must be a string. `hashtags` must be a list of strings; a single
/// whitespace-separated string is accepted too.
pub fn parse_caption(raw: &str) -> AiResult<CaptionResult> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(mut object) = value else {
        return Err(AiError::invalid_response("caption response is not a JSON object"));
    };

    let caption = match object.remove("caption") {
        Some(Value::String(caption)) => caption.trim().to_string(),
        Some(_) => return Err(AiError::invalid_response("caption is not a string")),
        None => return Err(AiError::invalid_response("caption missing")),
    };

    let hashtags = match object.remove("hashtags") {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(tag) => Ok(tag.trim().to_string()),
                _ => Err(AiError::invalid_response("hashtag is not a string")),
            })
            .filter(|tag| !matches!(tag, Ok(t) if t.is_empty()))
            .collect::<AiResult<Vec<_>>>()?,
        Some(Value::String(line)) => line.split_whitespace().map(str::to_string).collect(),
        Some(_) => return Err(AiError::invalid_response("hashtags is not a list")),
        None => return Err(AiError::invalid_response("hashtags missing")),
    };

    Ok(CaptionResult::new(caption, hashtags))
}

/// Asks the text service for a caption, falling back on any failure.
#[derive(Clone)]
pub struct CaptionResolver {
    generator: Arc<dyn TextGenerator>,
}

impl CaptionResolver {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Resolve a caption for merged `metadata`. Never fails.
    pub async fn resolve(&self, metadata: &SessionMetadata) -> CaptionResult {
        match self.try_resolve(metadata).await {
            Ok(caption) => {
                debug!(hashtags = caption.hashtags.len(), "Caption resolved");
                caption
            }
            Err(e) => {
                warn!(error = %e, "Could not resolve caption, using fallback");
                metrics::counter!("looplabs_text_fallbacks_total", "stage" => "caption", "reason" => e.kind())
                    .increment(1);
                CaptionResult::fallback()
            }
        }
    }

    async fn try_resolve(&self, metadata: &SessionMetadata) -> AiResult<CaptionResult> {
        let request = CompletionRequest::json(caption_prompt(metadata));
        let raw = self.generator.complete(&request).await?;
        parse_caption(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use looplabs_models::caption::{FALLBACK_CAPTION, FALLBACK_HASHTAGS};

    struct Canned(&'static str);

    #[async_trait]
    impl TextGenerator for Canned {
        async fn complete(&self, _request: &CompletionRequest) -> AiResult<String> {
            Ok(self.0.to_string())
        }
    }

    fn resolver(raw: &'static str) -> CaptionResolver {
        CaptionResolver::new(Arc::new(Canned(raw)))
    }

    fn sunrise() -> SessionMetadata {
        SessionMetadata {
            theme: Some("sunrise".to_string()),
            mood: Some("calm".to_string()),
            keywords: Some(vec!["sunrise".to_string(), "gold".to_string()]),
            ..Default::default()
        }
    }

    #[test]
    fn test_prompt_uses_theme_mood_keywords() {
        let prompt = caption_prompt(&sunrise());
        assert!(prompt.contains("Theme: sunrise"));
        assert!(prompt.contains("Mood: calm"));
        assert!(prompt.contains("Keywords: sunrise, gold"));
    }

    #[test]
    fn test_prompt_tolerates_missing_fields() {
        let prompt = caption_prompt(&SessionMetadata::default());
        assert!(prompt.contains("Theme: None"));
        assert!(prompt.contains("Keywords: \n"));
    }

    #[tokio::test]
    async fn test_valid_caption() {
        let caption = resolver(r##"{"caption":"Rise and shine.","hashtags":["#sunrise"," #gold ",""]}"##)
            .resolve(&sunrise())
            .await;
        assert_eq!(caption.caption, "Rise and shine.");
        assert_eq!(caption.hashtags, vec!["#sunrise", "#gold"]);
    }

    #[test]
    fn test_hashtag_string_is_split() {
        let caption = parse_caption(r##"{"caption":"x","hashtags":"#a #b"}"##).unwrap();
        assert_eq!(caption.hashtags, vec!["#a", "#b"]);
    }

    #[tokio::test]
    async fn test_malformed_body_returns_exact_fallback() {
        let caption = resolver("{not json").resolve(&sunrise()).await;
        assert_eq!(caption.caption, FALLBACK_CAPTION);
        assert_eq!(caption.hashtags, FALLBACK_HASHTAGS);
        assert_eq!(caption.hashtags.len(), 8);
    }

    #[tokio::test]
    async fn test_schema_violation_falls_back() {
        assert_eq!(
            resolver(r#"{"caption": 3, "hashtags": []}"#).resolve(&sunrise()).await,
            CaptionResult::fallback()
        );
        assert_eq!(
            resolver(r#"{"caption": "ok"}"#).resolve(&sunrise()).await,
            CaptionResult::fallback()
        );
        assert_eq!(
            resolver(r#"{"caption": "ok", "hashtags": [1, 2]}"#).resolve(&sunrise()).await,
            CaptionResult::fallback()
        );
    }
}

//! Caption and hashtag results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Caption used when the text service gives nothing usable.
pub const FALLBACK_CAPTION: &str =
    "Golden light over a quiet city skyline — calm meets creativity.";

/// Hashtags used alongside [`FALLBACK_CAPTION`].
pub const FALLBACK_HASHTAGS: [&str; 8] = [
    "#LoopLabs",
    "#AI",
    "#Visuals",
    "#Sunrise",
    "#Cinematic",
    "#Creative",
    "#Inspiration",
    "#Design",
];

/// Social caption for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CaptionResult {
    pub caption: String,
    pub hashtags: Vec<String>,
}

impl CaptionResult {
    pub fn new(caption: impl Into<String>, hashtags: Vec<String>) -> Self {
        Self {
            caption: caption.into(),
            hashtags,
        }
    }

    /// The fixed fallback caption.
    pub fn fallback() -> Self {
        Self {
            caption: FALLBACK_CAPTION.to_string(),
            hashtags: FALLBACK_HASHTAGS.iter().map(|h| h.to_string()).collect(),
        }
    }

    /// Hashtags on one line, separated by single spaces.
    pub fn hashtags_line(&self) -> String {
        self.hashtags.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_has_eight_hashtags() {
        let fallback = CaptionResult::fallback();
        assert_eq!(fallback.hashtags.len(), 8);
        assert_eq!(fallback.caption, FALLBACK_CAPTION);
        assert!(fallback.hashtags.iter().all(|h| h.starts_with('#')));
    }

    #[test]
    fn test_hashtags_line() {
        let caption = CaptionResult::new("x", vec!["#a".into(), "#b".into()]);
        assert_eq!(caption.hashtags_line(), "#a #b");
        assert_eq!(CaptionResult::new("x", vec![]).hashtags_line(), "");
    }
}

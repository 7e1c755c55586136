//! Session manifest and artifact file names.

use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metadata::SessionMetadata;

/// Encoded loop.
pub const VIDEO_FILENAME: &str = "loop.mp4";
/// Still frame taken from the loop.
pub const THUMBNAIL_FILENAME: &str = "thumbnail.png";
/// Caption text.
pub const CAPTION_FILENAME: &str = "caption.txt";
/// Space-joined hashtags.
pub const HASHTAGS_FILENAME: &str = "hashtags.txt";
/// The manifest itself.
pub const MANIFEST_FILENAME: &str = "package_manifest.json";

/// Human-readable timestamp format for `created`.
pub const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Relative file names of a session's artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ManifestAssets {
    pub video: String,
    pub thumbnail: String,
    pub caption: String,
    pub hashtags: String,
}

impl Default for ManifestAssets {
    fn default() -> Self {
        Self {
            video: VIDEO_FILENAME.to_string(),
            thumbnail: THUMBNAIL_FILENAME.to_string(),
            caption: CAPTION_FILENAME.to_string(),
            hashtags: HASHTAGS_FILENAME.to_string(),
        }
    }
}

/// Record written once per session as `package_manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Manifest {
    /// Prompt as the user typed it
    pub prompt: String,
    /// Style name as the user typed it
    pub style: String,
    pub mood: Option<String>,
    pub font: Option<String>,
    pub music: Option<String>,
    /// Local time, `YYYY-MM-DD HH:MM:SS`
    pub created: String,
    pub assets: ManifestAssets,
}

impl Manifest {
    /// Build the manifest from the merged session metadata.
    pub fn new(
        prompt: impl Into<String>,
        style: impl Into<String>,
        metadata: &SessionMetadata,
        created: DateTime<Local>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            style: style.into(),
            mood: metadata.mood.clone(),
            font: metadata.font.clone(),
            music: metadata.music.clone(),
            created: created.format(CREATED_FORMAT).to_string(),
            assets: ManifestAssets::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manifest_shape() {
        let meta = SessionMetadata {
            mood: Some("calm".into()),
            font: Some("Helvetica-Bold".into()),
            ..Default::default()
        };
        let created = Local.with_ymd_and_hms(2025, 3, 1, 9, 5, 7).unwrap();
        let manifest = Manifest::new("golden sunrise", "minimalist", &meta, created);

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["prompt"], "golden sunrise");
        assert_eq!(json["created"], "2025-03-01 09:05:07");
        assert_eq!(json["mood"], "calm");
        assert!(json["music"].is_null());
        assert_eq!(json["assets"]["video"], "loop.mp4");
        assert_eq!(json["assets"]["thumbnail"], "thumbnail.png");
        assert_eq!(json["assets"]["caption"], "caption.txt");
        assert_eq!(json["assets"]["hashtags"], "hashtags.txt");
    }
}

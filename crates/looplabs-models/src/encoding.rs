//! Render and encoding configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default encoding preset
pub const DEFAULT_PRESET: &str = "fast";
/// Default CRF (Constant Rate Factor)
pub const DEFAULT_CRF: u8 = 18;
/// Default audio bitrate
pub const DEFAULT_AUDIO_BITRATE: &str = "128k";
/// Output pixel format; yuv420p keeps the file playable everywhere
pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";

/// Loop geometry and timing
pub const DEFAULT_WIDTH: u32 = 720;
pub const DEFAULT_HEIGHT: u32 = 720;
pub const DEFAULT_FPS: u32 = 24;
pub const DEFAULT_DURATION_SECS: f64 = 5.0;

/// Text overlay defaults
pub const DEFAULT_FONT: &str = "Helvetica-Bold";
pub const DEFAULT_FONT_SIZE: u32 = 60;
pub const DEFAULT_TEXT_COLOR: &str = "white";

/// Fade length for the `fade` motion, at each end
pub const MOTION_FADE_SECS: f64 = 1.0;
/// Fade length applied to background music, at each end
pub const AUDIO_FADE_SECS: f64 = 0.5;

/// Requested thumbnail time; clamped to half the clip duration
pub const DEFAULT_THUMBNAIL_AT_SECS: f64 = 0.5;

/// Video encoding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EncodingConfig {
    /// Video codec (e.g., "libx264")
    #[serde(default = "default_video_codec")]
    pub codec: String,

    /// Encoding preset (e.g., "fast", "medium", "slow")
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Constant Rate Factor (quality, 0-51, lower is better)
    #[serde(default = "default_crf")]
    pub crf: u8,

    /// Output pixel format
    #[serde(default = "default_pixel_format")]
    pub pixel_format: String,

    /// Audio codec
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Audio bitrate
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,
}

fn default_video_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_crf() -> u8 {
    DEFAULT_CRF
}
fn default_pixel_format() -> String {
    DEFAULT_PIXEL_FORMAT.to_string()
}
fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_audio_bitrate() -> String {
    DEFAULT_AUDIO_BITRATE.to_string()
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            preset: DEFAULT_PRESET.to_string(),
            crf: DEFAULT_CRF,
            pixel_format: DEFAULT_PIXEL_FORMAT.to_string(),
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            audio_bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
        }
    }
}

impl EncodingConfig {
    /// Video-side FFmpeg output arguments.
    pub fn video_args(&self) -> Vec<String> {
        vec![
            "-c:v".to_string(),
            self.codec.clone(),
            "-preset".to_string(),
            self.preset.clone(),
            "-crf".to_string(),
            self.crf.to_string(),
            "-pix_fmt".to_string(),
            self.pixel_format.clone(),
        ]
    }

    /// Audio-side FFmpeg output arguments.
    pub fn audio_args(&self) -> Vec<String> {
        vec![
            "-c:a".to_string(),
            self.audio_codec.clone(),
            "-b:a".to_string(),
            self.audio_bitrate.clone(),
        ]
    }
}

/// Fixed geometry, timing and encoding for every rendered loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub duration_secs: f64,
    #[serde(default)]
    pub encoding: EncodingConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
            duration_secs: DEFAULT_DURATION_SECS,
            encoding: EncodingConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Number of frames in one loop.
    pub fn frame_count(&self) -> u64 {
        (self.duration_secs * self.fps as f64).round().max(0.0) as u64
    }

    /// Presentation time of frame `index`, in seconds.
    pub fn frame_time(&self, index: u64) -> f64 {
        index as f64 / self.fps as f64
    }

    /// `WxH`, as FFmpeg expects it.
    pub fn size_arg(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

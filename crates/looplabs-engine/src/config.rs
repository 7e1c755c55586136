//! Engine configuration.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use looplabs_ai::OpenAiConfig;
use looplabs_media::PulseMode;
use looplabs_models::encoding::{
    DEFAULT_DURATION_SECS, DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_THUMBNAIL_AT_SECS, DEFAULT_WIDTH,
};
use looplabs_models::{EncodingConfig, RenderConfig};

/// Engine configuration, built once per process.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root under which `pack_<session_id>` directories are created
    pub output_root: PathBuf,
    /// Style preset store (`<dir>/<name>.json`)
    pub style_dir: PathBuf,
    /// Loop geometry, timing and encoding
    pub render: RenderConfig,
    /// Requested thumbnail time in seconds
    pub thumbnail_at: f64,
    /// Strategy behind `pulse` motion
    pub pulse: PulseMode,
    /// Fixed seed for the flicker pulse
    pub pulse_seed: Option<u64>,
    /// Encoder timeout in seconds
    pub render_timeout: Option<u64>,
    /// Text service settings
    pub ai: OpenAiConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("output"),
            style_dir: PathBuf::from("styles"),
            render: RenderConfig::default(),
            thumbnail_at: DEFAULT_THUMBNAIL_AT_SECS,
            pulse: PulseMode::default(),
            pulse_seed: None,
            render_timeout: None,
            ai: OpenAiConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            output_root: std::env::var("LOOPLABS_OUTPUT_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("output")),
            style_dir: std::env::var("LOOPLABS_STYLE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("styles")),
            render: RenderConfig {
                width: env_parse("LOOPLABS_WIDTH").unwrap_or(DEFAULT_WIDTH),
                height: env_parse("LOOPLABS_HEIGHT").unwrap_or(DEFAULT_HEIGHT),
                fps: env_parse("LOOPLABS_FPS").unwrap_or(DEFAULT_FPS),
                duration_secs: env_parse("LOOPLABS_DURATION").unwrap_or(DEFAULT_DURATION_SECS),
                encoding: EncodingConfig::default(),
            },
            thumbnail_at: env_parse("LOOPLABS_THUMBNAIL_AT").unwrap_or(DEFAULT_THUMBNAIL_AT_SECS),
            pulse: env_parse("LOOPLABS_PULSE").unwrap_or_default(),
            pulse_seed: env_parse("LOOPLABS_PULSE_SEED"),
            render_timeout: env_parse("LOOPLABS_RENDER_TIMEOUT"),
            ai: OpenAiConfig::from_env(),
        }
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_style_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.style_dir = dir.into();
        self
    }
}

/// Parse an environment variable, warning when it is set but unusable.
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment variable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.output_root, PathBuf::from("output"));
        assert_eq!(config.style_dir, PathBuf::from("styles"));
        assert_eq!(config.render.width, 720);
        assert_eq!(config.render.fps, 24);
        assert_eq!(config.thumbnail_at, 0.5);
        assert_eq!(config.pulse, PulseMode::Flicker);
        assert!(config.render_timeout.is_none());
    }

    #[test]
    fn test_env_parse_rejects_garbage() {
        std::env::set_var("LOOPLABS_TEST_ENV_PARSE", "not-a-number");
        assert_eq!(env_parse::<u32>("LOOPLABS_TEST_ENV_PARSE"), None);
        std::env::set_var("LOOPLABS_TEST_ENV_PARSE", " 42 ");
        assert_eq!(env_parse::<u32>("LOOPLABS_TEST_ENV_PARSE"), Some(42));
        std::env::remove_var("LOOPLABS_TEST_ENV_PARSE");
        assert_eq!(env_parse::<u32>("LOOPLABS_TEST_ENV_PARSE"), None);
    }
}

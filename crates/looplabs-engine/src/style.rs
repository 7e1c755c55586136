//! Style resolution: preset store, built-in table, minimalist fallback.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use looplabs_models::{BuiltinStyle, SessionMetadata, StyleName};

use crate::error::{EngineError, EngineResult};

/// Named preset lookup.
#[async_trait]
pub trait StyleStore: Send + Sync {
    /// `Ok(None)` when the store has no preset under `name`.
    async fn load(&self, name: &StyleName) -> EngineResult<Option<SessionMetadata>>;
}

/// Presets stored as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryStyleStore {
    dir: PathBuf,
}

impl DirectoryStyleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn preset_path(&self, name: &StyleName) -> PathBuf {
        self.dir.join(format!("{}.json", name.as_str()))
    }
}

#[async_trait]
impl StyleStore for DirectoryStyleStore {
    async fn load(&self, name: &StyleName) -> EngineResult<Option<SessionMetadata>> {
        let path = self.preset_path(name);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let value: serde_json::Value = serde_json::from_str(&raw)?;
        let (preset, issues) = SessionMetadata::from_json_value(value).map_err(|e| {
            EngineError::config_error(format!("{}: {}", path.display(), e))
        })?;
        for issue in issues {
            warn!(
                preset = %path.display(),
                field = %issue.field,
                reason = %issue.reason,
                "Dropping malformed preset field"
            );
        }
        Ok(Some(preset))
    }
}

/// Where a resolved style came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleSource {
    Store,
    Builtin,
    /// Unknown name, minimalist used instead
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    /// Normalized name that was looked up
    pub name: StyleName,
    pub source: StyleSource,
    pub preset: SessionMetadata,
}

/// Resolves style names. Never fails.
#[derive(Clone, Default)]
pub struct StyleResolver {
    store: Option<Arc<dyn StyleStore>>,
}

impl StyleResolver {
    /// Resolver consulting `store` before the built-ins.
    pub fn new(store: Arc<dyn StyleStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Resolver backed by a preset directory.
    pub fn with_directory(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(DirectoryStyleStore::new(dir)))
    }

    /// Resolver using only the built-in presets.
    pub fn builtin_only() -> Self {
        Self { store: None }
    }

    pub async fn resolve(&self, raw_name: &str) -> ResolvedStyle {
        let name = StyleName::normalize(raw_name);

        if let Some(preset) = self.load_from_store(&name).await {
            debug!(style = %name, "Style loaded from store");
            return ResolvedStyle {
                name,
                source: StyleSource::Store,
                preset,
            };
        }

        if let Ok(builtin) = name.as_str().parse::<BuiltinStyle>() {
            debug!(style = %name, "Using built-in style");
            return ResolvedStyle {
                name,
                source: StyleSource::Builtin,
                preset: builtin.preset(),
            };
        }

        warn!(style = %name, "Unknown style, using {}", BuiltinStyle::FALLBACK);
        metrics::counter!("looplabs_style_fallbacks_total").increment(1);
        ResolvedStyle {
            name,
            source: StyleSource::Fallback,
            preset: BuiltinStyle::FALLBACK.preset(),
        }
    }

    async fn load_from_store(&self, name: &StyleName) -> Option<SessionMetadata> {
        let store = self.store.as_ref()?;
        if !name.is_safe_file_stem() {
            debug!(style = %name, "Style name is not a safe file name, skipping store");
            return None;
        }

        match store.load(name).await {
            Ok(found) => found,
            Err(e) => {
                warn!(style = %name, error = %e, "Style preset unreadable, treating as not found");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use looplabs_models::Rgb;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn write_preset(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(format!("{name}.json")), body).unwrap();
    }

    #[tokio::test]
    async fn test_store_preset_wins_over_builtin() {
        let dir = tempfile::tempdir().unwrap();
        write_preset(dir.path(), "luxury", r#"{"font": "Didot", "font_size": 80}"#);

        let style = StyleResolver::with_directory(dir.path()).resolve("Luxury").await;
        assert_eq!(style.source, StyleSource::Store);
        assert_eq!(style.preset.font.as_deref(), Some("Didot"));
        assert!(style.preset.music.is_none());
    }

    #[tokio::test]
    async fn test_custom_store_style() {
        let dir = tempfile::tempdir().unwrap();
        write_preset(
            dir.path(),
            "neon",
            r##"{"color_primary": [20, 0, 40], "text_color": "#00ffcc", "glow": true}"##,
        );

        let style = StyleResolver::with_directory(dir.path()).resolve(" NEON ").await;
        assert_eq!(style.name.as_str(), "neon");
        assert_eq!(style.preset.color_primary, Some(Rgb::new(20, 0, 40)));
        assert_eq!(style.preset.extra.get("glow"), Some(&serde_json::json!(true)));
    }

    #[tokio::test]
    async fn test_corrupt_preset_falls_through_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        write_preset(dir.path(), "energetic", "{ not json");

        let style = StyleResolver::with_directory(dir.path()).resolve("energetic").await;
        assert_eq!(style.source, StyleSource::Builtin);
        assert_eq!(style.preset, BuiltinStyle::Energetic.preset());
    }

    #[tokio::test]
    async fn test_non_object_preset_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        write_preset(dir.path(), "vaporwave", "[1, 2, 3]");

        let style = StyleResolver::with_directory(dir.path()).resolve("vaporwave").await;
        assert_eq!(style.source, StyleSource::Fallback);
        assert_eq!(style.preset, BuiltinStyle::Minimalist.preset());
    }

    #[tokio::test]
    async fn test_mixed_case_resolves_like_lowercase() {
        let resolver = StyleResolver::with_directory("/nonexistent/styles");
        let a = resolver.resolve("LUXURY ").await;
        let b = resolver.resolve("luxury").await;
        assert_eq!(a, b);
        assert_eq!(a.source, StyleSource::Builtin);
    }

    #[tokio::test]
    async fn test_unknown_and_empty_names_use_minimalist() {
        let resolver = StyleResolver::builtin_only();
        for name in ["", "   ", "vaporwave", "../../etc/passwd"] {
            let style = resolver.resolve(name).await;
            assert_eq!(style.source, StyleSource::Fallback, "{name:?}");
            assert_eq!(style.preset, BuiltinStyle::Minimalist.preset());
            assert!(!style.preset.is_empty());
        }
    }

    struct CountingStore(AtomicUsize);

    #[async_trait]
    impl StyleStore for CountingStore {
        async fn load(&self, _name: &StyleName) -> EngineResult<Option<SessionMetadata>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_unsafe_names_never_reach_store() {
        let store = Arc::new(CountingStore(AtomicUsize::new(0)));
        let resolver = StyleResolver::new(store.clone());

        resolver.resolve("../secrets").await;
        resolver.resolve("a/b").await;
        assert_eq!(store.0.load(Ordering::SeqCst), 0);

        resolver.resolve("minimalist").await;
        assert_eq!(store.0.load(Ordering::SeqCst), 1);
    }
}

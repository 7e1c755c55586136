//! Session directories and the files written into them.

use std::path::{Path, PathBuf};

use tracing::debug;

use looplabs_models::manifest::{
    CAPTION_FILENAME, HASHTAGS_FILENAME, MANIFEST_FILENAME, THUMBNAIL_FILENAME, VIDEO_FILENAME,
};
use looplabs_models::{CaptionResult, Manifest, SessionId};

use crate::error::{EngineError, EngineResult};

/// `<output_root>/pack_<session_id>` and the artifact paths inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDir {
    id: SessionId,
    path: PathBuf,
}

impl SessionDir {
    pub fn new(output_root: impl AsRef<Path>, id: SessionId) -> Self {
        let path = output_root.as_ref().join(id.dir_name());
        Self { id, path }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn video_path(&self) -> PathBuf {
        self.path.join(VIDEO_FILENAME)
    }

    pub fn thumbnail_path(&self) -> PathBuf {
        self.path.join(THUMBNAIL_FILENAME)
    }

    pub fn caption_path(&self) -> PathBuf {
        self.path.join(CAPTION_FILENAME)
    }

    pub fn hashtags_path(&self) -> PathBuf {
        self.path.join(HASHTAGS_FILENAME)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(MANIFEST_FILENAME)
    }
}

/// Creates session directories and writes the text artifacts.
///
/// The video and thumbnail are produced in place by the renderer.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Create the directory for `id` and its parents. Idempotent.
    pub async fn allocate(&self, id: &SessionId) -> EngineResult<SessionDir> {
        let dir = SessionDir::new(&self.output_root, id.clone());
        tokio::fs::create_dir_all(dir.path()).await.map_err(|e| {
            EngineError::artifact_failed(format!(
                "could not create {}: {}",
                dir.path().display(),
                e
            ))
        })?;
        debug!(dir = %dir.path().display(), "Session directory ready");
        Ok(dir)
    }

    /// Write caption, hashtags and manifest, in that order.
    ///
    /// Each file is overwritten whole. A failure leaves earlier files in place.
    pub async fn write_session(
        &self,
        dir: &SessionDir,
        caption: &CaptionResult,
        manifest: &Manifest,
    ) -> EngineResult<()> {
        tokio::fs::create_dir_all(dir.path()).await?;

        tokio::fs::write(dir.caption_path(), caption.caption.as_bytes()).await?;
        tokio::fs::write(dir.hashtags_path(), caption.hashtags_line().as_bytes()).await?;

        let manifest_json = serde_json::to_string_pretty(manifest)?;
        tokio::fs::write(dir.manifest_path(), manifest_json.as_bytes()).await?;

        debug!(dir = %dir.path().display(), "Session artifacts written");
        Ok(())
    }
}

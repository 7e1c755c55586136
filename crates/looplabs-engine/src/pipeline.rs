//! One end-to-end session: concept, style, merge, render, caption, artifacts.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use serde::Serialize;
use tracing::Instrument;

use looplabs_ai::{
    CaptionResolver, ConceptResolver, OfflineGenerator, OpenAiClient, PromptEnricher,
    TextGenerator,
};
use looplabs_media::{FfmpegRenderer, Renderer};
use looplabs_models::{merge, CaptionResult, Manifest, SessionId, SessionMetadata};

use crate::artifacts::{ArtifactWriter, SessionDir};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::logging::SessionLogger;
use crate::style::{ResolvedStyle, StyleResolver, StyleSource};

/// What the caller asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub prompt: String,
    pub style: String,
    /// Expand the prompt before concept resolution
    pub enrich: bool,
}

impl SessionRequest {
    pub fn new(prompt: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style: style.into(),
            enrich: false,
        }
    }

    pub fn with_enrich(mut self, enrich: bool) -> Self {
        self.enrich = enrich;
        self
    }
}

/// Everything a finished session produced.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub session_id: SessionId,
    pub output_dir: PathBuf,
    /// Merged concept and style
    pub metadata: SessionMetadata,
    pub style_source: StyleSource,
    pub caption: CaptionResult,
    pub manifest: Manifest,
    pub thumbnail_created: bool,
}

/// The content pipeline.
///
/// Stages run strictly in order. Only render and artifact I/O failures end
/// a session; everything else degrades to a fallback.
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<EngineConfig>,
    concept: ConceptResolver,
    caption: CaptionResolver,
    enricher: PromptEnricher,
    styles: StyleResolver,
    renderer: Arc<dyn Renderer>,
    writer: ArtifactWriter,
}

impl Pipeline {
    pub fn new(
        config: Arc<EngineConfig>,
        generator: Arc<dyn TextGenerator>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            concept: ConceptResolver::new(generator.clone()),
            caption: CaptionResolver::new(generator.clone()),
            enricher: PromptEnricher::new(generator),
            styles: StyleResolver::with_directory(config.style_dir.clone()),
            renderer,
            writer: ArtifactWriter::new(config.output_root.clone()),
            config,
        }
    }

    /// Pipeline with the OpenAI client (or the offline generator) and FFmpeg.
    pub fn from_config(config: Arc<EngineConfig>, offline: bool) -> EngineResult<Self> {
        let generator: Arc<dyn TextGenerator> = if offline {
            Arc::new(OfflineGenerator)
        } else {
            Arc::new(OpenAiClient::new(config.ai.clone())?)
        };

        let mut renderer = FfmpegRenderer::new(config.render.clone())
            .with_pulse_mode(config.pulse)
            .with_timeout(config.render_timeout);
        if let Some(seed) = config.pulse_seed {
            renderer = renderer.with_seed(seed);
        }

        Ok(Self::new(config, generator, Arc::new(renderer)))
    }

    /// Replace the style resolver.
    pub fn with_style_resolver(mut self, styles: StyleResolver) -> Self {
        self.styles = styles;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one session.
    pub async fn run(&self, request: &SessionRequest) -> EngineResult<SessionOutcome> {
        let session_id = SessionId::new();
        let logger = SessionLogger::new(&session_id);
        let started = Instant::now();
        metrics::counter!("looplabs_sessions_started_total").increment(1);

        let result = self
            .execute(&session_id, request, &logger)
            .instrument(logger.create_span())
            .await;

        match &result {
            Ok(outcome) => {
                metrics::counter!("looplabs_sessions_completed_total").increment(1);
                metrics::histogram!("looplabs_session_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                logger.log_completion(&format!("{}", outcome.output_dir.display()));
            }
            Err(e) => {
                metrics::counter!("looplabs_sessions_failed_total", "reason" => e.kind())
                    .increment(1);
                logger.log_error(&e.to_string());
            }
        }
        result
    }

    async fn execute(
        &self,
        session_id: &SessionId,
        request: &SessionRequest,
        logger: &SessionLogger,
    ) -> EngineResult<SessionOutcome> {
        logger.log_start(&format!("prompt={:?} style={:?}", request.prompt, request.style));
        let dir = self.writer.allocate(session_id).await?;

        let concept_prompt = if request.enrich {
            let enriched = self.enricher.enrich(&request.prompt).await;
            logger.for_stage("enrich").log_progress("Prompt ready");
            enriched
        } else {
            request.prompt.clone()
        };

        let concept = self.concept.resolve(&concept_prompt).await;
        logger.for_stage("concept").log_progress("Concept resolved");

        let style = self.styles.resolve(&request.style).await;
        log_style(logger, &style);

        let metadata = merge(concept, &style.preset);

        let render_log = logger.for_stage("render");
        render_log.log_progress("Rendering loop");
        self.renderer.render(&metadata, &dir.video_path()).await?;

        let thumbnail_created = self.thumbnail(&dir, &logger.for_stage("thumbnail")).await;

        let caption = self.caption.resolve(&metadata).await;
        logger.for_stage("caption").log_progress("Caption resolved");

        let manifest = Manifest::new(&request.prompt, &request.style, &metadata, Local::now());
        self.writer.write_session(&dir, &caption, &manifest).await?;
        logger.for_stage("artifacts").log_progress("Artifacts written");

        Ok(SessionOutcome {
            session_id: session_id.clone(),
            output_dir: dir.path().to_path_buf(),
            metadata,
            style_source: style.source,
            caption,
            manifest,
            thumbnail_created,
        })
    }

    async fn thumbnail(&self, dir: &SessionDir, logger: &SessionLogger) -> bool {
        match self
            .renderer
            .thumbnail(&dir.video_path(), &dir.thumbnail_path(), self.config.thumbnail_at)
            .await
        {
            Ok(at) => {
                logger.log_progress(&format!("Thumbnail sampled at {:.2}s", at));
                true
            }
            Err(e) => {
                logger.log_warning(&format!("Thumbnail skipped: {}", e));
                metrics::counter!("looplabs_thumbnail_skipped_total").increment(1);
                false
            }
        }
    }
}

fn log_style(logger: &SessionLogger, style: &ResolvedStyle) {
    let logger = logger.for_stage("style");
    match style.source {
        StyleSource::Fallback => logger.log_warning(&format!(
            "Style {:?} not found, using minimalist",
            style.name.as_str()
        )),
        source => logger.log_progress(&format!("Style {} resolved from {:?}", style.name, source)),
    }
}

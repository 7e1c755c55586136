//! Loop rendering: background synthesis, text overlay, music, encode.

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use looplabs_models::encoding::{
    AUDIO_FADE_SECS, DEFAULT_FONT, DEFAULT_FONT_SIZE, DEFAULT_TEXT_COLOR,
};
use looplabs_models::{RenderConfig, Rgb, SessionMetadata};

use crate::command::{FfmpegCommand, FfmpegInput, FfmpegRunner, FrameFeed};
use crate::error::{MediaError, MediaResult};
use crate::filters::{audio_fade_filter, drawtext_filter, ffmpeg_color, TextOverlay};
use crate::frames::BackgroundFrames;
use crate::motion::{motion_effect, PulseMode};
use crate::probe::probe_audio;
use crate::thumbnail::extract_thumbnail;

/// Produces the loop video and its thumbnail.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render `metadata` into a video at `dest`.
    async fn render(&self, metadata: &SessionMetadata, dest: &Path) -> MediaResult<()>;

    /// Save one frame of `video` near `at` seconds as a still at `dest`.
    ///
    /// Returns the timestamp actually sampled.
    async fn thumbnail(&self, video: &Path, dest: &Path, at: f64) -> MediaResult<f64>;
}

/// Renderer backed by the FFmpeg CLI.
#[derive(Debug, Clone)]
pub struct FfmpegRenderer {
    config: RenderConfig,
    pulse: PulseMode,
    seed: Option<u64>,
    timeout_secs: Option<u64>,
}

impl FfmpegRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            pulse: PulseMode::default(),
            seed: None,
            timeout_secs: None,
        }
    }

    /// Select the strategy used for `pulse` motion.
    pub fn with_pulse_mode(mut self, pulse: PulseMode) -> Self {
        self.pulse = pulse;
        self
    }

    /// Fix the random draws used by the flicker pulse.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_timeout(mut self, secs: Option<u64>) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn validate(&self) -> MediaResult<()> {
        let c = &self.config;
        if c.width == 0 || c.height == 0 {
            return Err(MediaError::invalid_settings("resolution must be non-zero"));
        }
        if c.width % 2 != 0 || c.height % 2 != 0 {
            return Err(MediaError::invalid_settings(format!(
                "{} requires even dimensions, got {}",
                c.encoding.pixel_format,
                c.size_arg()
            )));
        }
        if c.fps == 0 {
            return Err(MediaError::invalid_settings("fps must be positive"));
        }
        if !(c.duration_secs.is_finite() && c.duration_secs > 0.0) {
            return Err(MediaError::invalid_settings("duration must be positive"));
        }
        Ok(())
    }
}

/// Inputs to one encode, after optional layers have been resolved.
#[derive(Debug, Clone, Default)]
pub struct RenderPlan<'a> {
    pub text: Option<TextOverlay<'a>>,
    pub audio: Option<&'a Path>,
}

/// Build the encode command for a resolved plan.
///
/// Input 0 is the raw background on stdin; input 1, when present, is music.
pub fn build_render_command(config: &RenderConfig, dest: &Path, plan: &RenderPlan<'_>) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new(dest)
        .input(FfmpegInput::raw_rgb_pipe(config.width, config.height, config.fps));

    if let Some(audio) = plan.audio {
        cmd = cmd.input(FfmpegInput::file(audio));
    }

    let mut graph = Vec::new();
    let video_label = match &plan.text {
        Some(overlay) => {
            graph.push(format!("[0:v]{}[vout]", drawtext_filter(overlay)));
            "[vout]"
        }
        None => "0:v",
    };
    if plan.audio.is_some() {
        graph.push(format!(
            "[1:a]{}[aout]",
            audio_fade_filter(config.duration_secs, AUDIO_FADE_SECS)
        ));
    }
    if !graph.is_empty() {
        cmd = cmd.filter_complex(graph.join(";"));
    }

    cmd = cmd
        .map(video_label)
        .output_args(config.encoding.video_args())
        .frame_rate(config.fps);

    cmd = if plan.audio.is_some() {
        cmd.map("[aout]").output_args(config.encoding.audio_args())
    } else {
        cmd.no_audio()
    };

    cmd.output_duration(config.duration_secs).faststart()
}

/// Resolve the music track, degrading to silence on any problem.
async fn usable_audio(music: Option<&str>) -> Option<PathBuf> {
    let music = music.map(str::trim).filter(|m| !m.is_empty())?;
    let path = PathBuf::from(music);

    if !path.is_file() {
        warn!(music = %path.display(), "Music file not found, rendering without audio");
        return None;
    }

    match probe_audio(&path).await {
        Ok(info) => {
            debug!(music = %path.display(), codec = %info.codec, "Attaching music track");
            Some(path)
        }
        Err(e) => {
            warn!(music = %path.display(), error = %e, "Music could not be loaded, rendering without audio");
            None
        }
    }
}

fn text_color(metadata: &SessionMetadata) -> String {
    let requested = metadata.text_color.as_deref().unwrap_or(DEFAULT_TEXT_COLOR);
    ffmpeg_color(requested).unwrap_or_else(|| {
        warn!(text_color = requested, "Unsupported text color, using {}", DEFAULT_TEXT_COLOR);
        DEFAULT_TEXT_COLOR.to_string()
    })
}

#[async_trait]
impl Renderer for FfmpegRenderer {
    async fn render(&self, metadata: &SessionMetadata, dest: &Path) -> MediaResult<()> {
        self.validate()?;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let color = metadata.color.unwrap_or(Rgb::BLACK);
        let motion = metadata.motion_or_default();

        // drawtext reads the text from a file so no escaping is needed
        let textfile = match metadata.overlay_text() {
            Some(text) => {
                let mut file = tempfile::Builder::new()
                    .prefix("looplabs-text-")
                    .suffix(".txt")
                    .tempfile()?;
                file.write_all(text.as_bytes())?;
                file.flush()?;
                Some(file)
            }
            None => None,
        };

        let font = metadata.font.as_deref().unwrap_or(DEFAULT_FONT);
        let color_arg = text_color(metadata);
        let audio = usable_audio(metadata.music.as_deref()).await;

        let plan = RenderPlan {
            text: textfile.as_ref().map(|file| TextOverlay {
                textfile: file.path(),
                font,
                font_size: metadata.font_size.filter(|s| *s > 0).unwrap_or(DEFAULT_FONT_SIZE),
                color: &color_arg,
            }),
            audio: audio.as_deref(),
        };
        let cmd = build_render_command(&self.config, dest, &plan);

        info!(
            dest = %dest.display(),
            color = ?color.0,
            motion = %motion,
            text = plan.text.is_some(),
            audio = plan.audio.is_some(),
            "Rendering loop"
        );

        let frames: FrameFeed = Box::new(BackgroundFrames::new(
            color,
            &self.config,
            motion_effect(motion, self.pulse, self.seed),
        ));

        let started = Instant::now();
        let duration_secs = self.config.duration_secs;
        FfmpegRunner::new()
            .with_optional_timeout(self.timeout_secs)
            .run_with_frames(&cmd, frames, move |progress| {
                debug!(
                    frame = progress.frame,
                    percent = %format!("{:.0}", progress.percentage(duration_secs)),
                    speed = progress.speed,
                    "Render progress"
                );
            })
            .await?;

        let elapsed = started.elapsed().as_secs_f64();
        metrics::histogram!("looplabs_render_duration_seconds").record(elapsed);
        info!(dest = %dest.display(), elapsed_secs = %format!("{:.2}", elapsed), "Loop rendered");

        // The overlay file must outlive the encode
        drop(textfile);
        Ok(())
    }

    async fn thumbnail(&self, video: &Path, dest: &Path, at: f64) -> MediaResult<f64> {
        extract_thumbnail(video, dest, at, self.timeout_secs).await
    }
}

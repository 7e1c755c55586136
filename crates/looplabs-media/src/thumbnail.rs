//! Thumbnail extraction.

use std::path::Path;
use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegInput, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::video_duration;

/// Time to sample for a thumbnail: `min(requested, duration / 2)`, never negative.
pub fn thumbnail_time(requested: f64, duration: f64) -> f64 {
    let half = if duration.is_finite() { (duration / 2.0).max(0.0) } else { 0.0 };
    if !requested.is_finite() {
        return half;
    }
    requested.clamp(0.0, half)
}

/// Extract a single frame from `video_path` into `output_path`.
///
/// Returns the timestamp that was sampled.
pub async fn extract_thumbnail(
    video_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    at: f64,
    timeout_secs: Option<u64>,
) -> MediaResult<f64> {
    let video_path = video_path.as_ref();
    let output_path = output_path.as_ref();

    if !video_path.is_file() {
        return Err(MediaError::FileNotFound(video_path.to_path_buf()));
    }

    let duration = video_duration(video_path).await?;
    let time = thumbnail_time(at, duration);
    debug!(requested = at, duration, time, "Extracting thumbnail");

    let cmd = FfmpegCommand::new(output_path)
        .input(FfmpegInput::file(video_path).seek(time))
        .single_frame()
        .log_level("error");

    FfmpegRunner::new()
        .with_optional_timeout(timeout_secs)
        .run(&cmd)
        .await?;

    if !output_path.is_file() {
        return Err(MediaError::internal("FFmpeg produced no thumbnail"));
    }
    Ok(time)
}

//! FFmpeg CLI wrapper for rendering LoopLabs loops.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with multiple inputs
//! - Raw frame streaming to FFmpeg's stdin
//! - Progress parsing from `-progress pipe:2`
//! - Motion strategies for the solid-color background
//! - Loop rendering with text overlay and music
//! - Thumbnail extraction

pub mod command;
pub mod error;
pub mod filters;
pub mod frames;
pub mod motion;
pub mod probe;
pub mod progress;
pub mod render;
pub mod thumbnail;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegInput, FfmpegRunner, FrameFeed};
pub use error::{MediaError, MediaResult};
pub use frames::{mean_luma, BackgroundFrames};
pub use motion::{motion_effect, MotionEffect, PulseMode};
pub use probe::{probe_audio, probe_media, video_duration, MediaInfo};
pub use progress::FfmpegProgress;
pub use render::{build_render_command, FfmpegRenderer, RenderPlan, Renderer};
pub use thumbnail::{extract_thumbnail, thumbnail_time};

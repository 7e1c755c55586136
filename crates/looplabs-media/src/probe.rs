//! FFprobe media information.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// Summary of a media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Container duration in seconds
    pub duration: f64,
    /// First video stream, if any
    pub video: Option<VideoStreamInfo>,
    /// First audio stream, if any
    pub audio: Option<AudioStreamInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub codec: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    pub codec: String,
    pub sample_rate: Option<u32>,
    pub channels: Option<u32>,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u32>,
}

/// Probe a media file.
pub async fn probe_media(path: impl AsRef<Path>) -> MediaResult<MediaInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    // Check FFprobe exists
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::FfprobeFailed {
            message: format!("FFprobe could not read {}", path.display()),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;
    Ok(summarize(probe))
}

fn summarize(probe: FfprobeOutput) -> MediaInfo {
    let duration = probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let video = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .map(|s| VideoStreamInfo {
            width: s.width.unwrap_or(0),
            height: s.height.unwrap_or(0),
            fps: s
                .avg_frame_rate
                .as_deref()
                .or(s.r_frame_rate.as_deref())
                .and_then(parse_frame_rate)
                .unwrap_or(0.0),
            codec: s.codec_name.clone().unwrap_or_default(),
        });

    let audio = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "audio")
        .map(|s| AudioStreamInfo {
            codec: s.codec_name.clone().unwrap_or_default(),
            sample_rate: s.sample_rate.as_deref().and_then(|r| r.parse().ok()),
            channels: s.channels,
        });

    MediaInfo {
        duration,
        video,
        audio,
    }
}

/// Duration of a rendered video, in seconds.
pub async fn video_duration(path: impl AsRef<Path>) -> MediaResult<f64> {
    let info = probe_media(path).await?;
    if info.video.is_none() {
        return Err(MediaError::invalid_media("No video stream found"));
    }
    Ok(info.duration)
}

/// Confirm that `path` is decodable audio.
pub async fn probe_audio(path: impl AsRef<Path>) -> MediaResult<AudioStreamInfo> {
    let info = probe_media(path).await?;
    info.audio
        .ok_or_else(|| MediaError::invalid_media("No audio stream found"))
}

/// Parse frame rate string (e.g., "30/1" or "29.97").
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert!((parse_frame_rate("24/1").unwrap() - 24.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert!(parse_frame_rate("0/0").is_none());
    }

    #[test]
    fn test_summarize_streams() {
        let raw = r#"{
            "format": {"duration": "5.000000"},
            "streams": [
                {"codec_type": "video", "codec_name": "h264", "width": 720, "height": 720, "avg_frame_rate": "24/1"},
                {"codec_type": "audio", "codec_name": "aac", "sample_rate": "44100", "channels": 2}
            ]
        }"#;
        let info = summarize(serde_json::from_str(raw).unwrap());
        assert!((info.duration - 5.0).abs() < 1e-9);
        let video = info.video.unwrap();
        assert_eq!((video.width, video.height), (720, 720));
        assert!((video.fps - 24.0).abs() < 1e-9);
        let audio = info.audio.unwrap();
        assert_eq!(audio.sample_rate, Some(44100));
    }

    #[test]
    fn test_summarize_without_audio() {
        let raw = r#"{"format": {}, "streams": [{"codec_type": "video"}]}"#;
        let info = summarize(serde_json::from_str(raw).unwrap());
        assert_eq!(info.duration, 0.0);
        assert!(info.audio.is_none());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = probe_audio("/nonexistent/track.mp3").await;
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }
}

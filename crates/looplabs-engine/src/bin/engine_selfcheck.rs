use std::path::Path;
use std::process::Command;

use looplabs_engine::EngineConfig;
use looplabs_media::{check_ffmpeg, check_ffprobe, video_duration, FfmpegRenderer, Renderer};
use looplabs_models::{Motion, RenderConfig, Rgb, SessionMetadata};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = EngineConfig::from_env();

    println!(
        "engine-selfcheck: starting with output_root={}",
        config.output_root.display()
    );
    let ffmpeg = check_ffmpeg()?;
    let ffprobe = check_ffprobe()?;
    println!(
        "engine-selfcheck: ffmpeg={} ffprobe={}",
        ffmpeg.display(),
        ffprobe.display()
    );
    ensure_binary("ffmpeg")?;
    ensure_binary("ffprobe")?;
    ensure_output_root(&config.output_root).await?;
    render_test_clip().await?;

    if config.ai.api_key.is_none() {
        println!("engine-selfcheck: OPENAI_API_KEY not set, sessions will use fallback content");
    }

    println!("engine-selfcheck: ok");
    Ok(())
}

fn ensure_binary(name: &str) -> anyhow::Result<()> {
    let output = Command::new(name)
        .arg("-version")
        .output()
        .map_err(|e| anyhow::anyhow!("{} not available: {}", name, e))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!("{} -version failed: {:?}", name, output.status));
    }
    Ok(())
}

async fn ensure_output_root(path: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(path).await?;
    let probe = tempfile::NamedTempFile::new_in(path)
        .map_err(|e| anyhow::anyhow!("{} is not writable: {}", path.display(), e))?;
    drop(probe);
    Ok(())
}

async fn render_test_clip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let video = dir.path().join("selfcheck.mp4");
    let renderer = FfmpegRenderer::new(RenderConfig {
        width: 64,
        height: 64,
        duration_secs: 0.5,
        ..Default::default()
    });
    let metadata = SessionMetadata {
        color: Some(Rgb::new(255, 0, 0)),
        motion: Some(Motion::None),
        ..Default::default()
    };

    renderer.render(&metadata, &video).await?;
    let duration = video_duration(&video).await?;
    if duration <= 0.0 {
        return Err(anyhow::anyhow!("test clip has no duration"));
    }
    println!("engine-selfcheck: rendered {:.2}s test clip", duration);
    Ok(())
}

//! `looplabs "<prompt>" <style>`: generate one content pack.

use std::process::ExitCode;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, info};

use looplabs_engine::{init_tracing, EngineConfig, Pipeline, SessionRequest};

const USAGE: &str = "Usage: looplabs \"your prompt here\" <style>";

#[derive(Parser, Debug)]
#[command(name = "looplabs")]
#[command(about = "Generate a looping video content pack from a prompt", long_about = None)]
struct Cli {
    /// Creative prompt, e.g. "golden sunrise"
    prompt: String,

    /// Style preset (minimalist, luxury, energetic, or a file in the style directory)
    style: String,

    /// Expand the prompt into a fuller description first
    #[arg(long)]
    enrich: bool,

    /// Skip the text service and use fallback content
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            eprintln!("{}", USAGE);
            return ExitCode::from(1);
        }
    };

    // Install rustls crypto provider (required for TLS/HTTPS)
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        eprintln!("rustls crypto provider already installed");
    }

    // Load environment variables
    dotenvy::dotenv().ok();
    init_tracing("looplabs=info");

    let config = Arc::new(EngineConfig::from_env());
    info!("Engine config: {:?}", config);

    let pipeline = match Pipeline::from_config(config, cli.offline) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to set up pipeline: {}", e);
            return ExitCode::from(1);
        }
    };

    let request = SessionRequest::new(cli.prompt, cli.style).with_enrich(cli.enrich);
    match pipeline.run(&request).await {
        Ok(outcome) => {
            println!("LoopLabs content pack ready: {}", outcome.output_dir.display());
            if !outcome.thumbnail_created {
                println!("(no thumbnail was produced)");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Session failed: {}", e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_and_style() {
        let cli = Cli::try_parse_from(["looplabs", "golden sunrise", "minimalist"]).unwrap();
        assert_eq!(cli.prompt, "golden sunrise");
        assert_eq!(cli.style, "minimalist");
        assert!(!cli.enrich);
        assert!(!cli.offline);
    }

    #[test]
    fn test_flags() {
        let cli =
            Cli::try_parse_from(["looplabs", "neon rain", "luxury", "--enrich", "--offline"]).unwrap();
        assert!(cli.enrich);
        assert!(cli.offline);
    }

    #[test]
    fn test_missing_style_is_an_error() {
        let err = Cli::try_parse_from(["looplabs", "golden sunrise"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}

//! Axum API server binary.

use anyhow::Context;
use tracing::{info, warn};

use looplabs_api::{create_router, metrics, ApiConfig, AppState};
use looplabs_engine::{init_tracing, EngineConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Required for rustls 0.23+; a second install is harmless
    let _ = rustls::crypto::ring::default_provider().install_default();

    init_tracing("looplabs=info");

    info!("Starting looplabs-api");

    let config = ApiConfig::from_env();
    let engine = EngineConfig::from_env();
    info!(
        host = %config.host,
        port = config.port,
        output_root = %engine.output_root.display(),
        "API config loaded"
    );

    let metrics_handle = if config.metrics_enabled {
        match metrics::init_metrics() {
            Ok(handle) => {
                info!("Prometheus metrics enabled at /metrics");
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Failed to install Prometheus recorder, metrics disabled");
                None
            }
        }
    } else {
        None
    };

    let state = AppState::from_engine_config(config.clone(), engine)
        .context("failed to build pipeline")?;
    let app = create_router(state, metrics_handle);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

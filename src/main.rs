use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use drone_capture::{
    create_router, AppState, Config, EncoderSupervisor, HttpAnalysisDispatcher, S3Publisher,
    SessionOrchestrator,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = Config::load("config/drone-capture")?;

    info!("{} v0.1.0", cfg.service.name);
    info!("Stream input: {}", cfg.recorder.stream_input);
    info!("Storage bucket: {}", cfg.storage.bucket);
    info!("Analysis service: {}", cfg.analysis.base_url);

    let supervisor = EncoderSupervisor::new(
        cfg.recorder.recordings_path.clone(),
        cfg.recorder.ffmpeg_path.clone(),
    );

    let publisher = Arc::new(S3Publisher::from_config(&cfg.storage).await);

    let dispatcher = Arc::new(
        HttpAnalysisDispatcher::new(
            cfg.analysis.base_url.clone(),
            Duration::from_secs(cfg.analysis.timeout_secs),
        )
        .context("Failed to build analysis client")?,
    );

    let orchestrator = Arc::new(SessionOrchestrator::new(
        supervisor,
        publisher,
        dispatcher,
        cfg.recorder.stream_input.clone(),
        cfg.storage.bucket.clone(),
        Duration::from_secs(cfg.storage.signed_url_ttl_secs),
    ));

    let state = AppState::new(orchestrator, cfg.service.expose_internal_errors);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("HTTP server error")?;

    Ok(())
}

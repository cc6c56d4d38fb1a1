use anyhow::{Context, Result};
use clap::Parser;
use live_dictation::{
    create_router, AppState, CapabilityProvider, Config, DictationRuntime, NatsProvider,
};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Live dictation service: toggle a recognition session and watch the transcript grow
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file path (extension optional)
    #[arg(short, long, default_value = "config/live-dictation")]
    config: String,

    /// Override the HTTP port from the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Live Dictation v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);
    info!("Recognition language: {}", cfg.recognition.language);

    let provider = NatsProvider::new(cfg.nats.url.clone())
        .with_environment(cfg.host_environment())
        .with_drain_timeout(Duration::from_millis(cfg.nats.drain_timeout_ms));
    let capability = provider.probe().await;
    if !capability.is_available() {
        warn!("No speech recognition capability; start requests will report it");
    }

    let (runtime, handle) =
        DictationRuntime::new(capability, cfg.recognition.clone(), provider.environment());
    let runtime_task = tokio::spawn(runtime.run());

    let port = args.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", cfg.service.http.bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(AppState::new(handle.clone())))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await
        .context("HTTP server failed")?;

    // Tear down the live session before exiting
    handle.shutdown().await?;
    runtime_task.await.context("Dictation runtime panicked")?;

    Ok(())
}

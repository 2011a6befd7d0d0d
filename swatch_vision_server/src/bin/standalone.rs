use swatch_vision::FrameColorExtractor;
use swatch_vision_server::{AppState, ServerConfig, start_server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    swatch_vision::logger::init();

    let cfg = ServerConfig::from_env()?;
    info!(store = ?cfg.store, sample_size = cfg.extractor.sample_size, "Starting Swatch Vision server");

    let store = cfg.store.open()?;
    let state = AppState::new(store, FrameColorExtractor::new(cfg.extractor.clone()));
    let server = start_server(&cfg.bind_addr, state).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    server.shutdown().await;
    Ok(())
}

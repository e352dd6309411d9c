use anyhow::{Context, Result};
use medibot::integration::MedibotConfig;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medibot=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Medibot health assistant");

    let mut config = MedibotConfig::load().context("Failed to load configuration")?;
    if let Err(e) = config.validate() {
        // Keep the assistant usable without speech models
        warn!("{}; falling back to text-only mode", e);
        config = config.without_audio_input().without_audio_output();
    }

    medibot::ui::run(config).map_err(|e| anyhow::anyhow!("UI error: {}", e))?;

    info!("Medibot shut down");
    Ok(())
}

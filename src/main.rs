use anyhow::{Context, Result};
use flexi_logger::Logger;
use log::{debug, info};
use try_traits::default::TryDefault;
use watermark_bot::Config;

mod bot;

#[tokio::main]
async fn main() -> Result<()> {
    let level = if cfg!(debug_assertions) { "debug" } else { "info" };
    let _logger = Logger::try_with_env_or_str(level)?
        .format(flexi_logger::detailed_format)
        .start()
        .context("Failed to start logger")?;
    info!("Starting bot");
    debug!("Creating config");
    let cfg = Config::try_default()?;
    debug!("Creating compositor");
    let compositor = cfg
        .watermark
        .compositor()
        .context("Invalid watermark configuration")?;
    debug!("Creating framework");
    let framework = bot::default_framework(&cfg);
    debug!("Creating client");
    let mut client = bot::default_client(&cfg, compositor, framework)
        .await
        .context("Failed to get client")?;
    info!("Connecting to Discord");
    client.start().await.context("Failed to start client")?;

    Ok(())
}

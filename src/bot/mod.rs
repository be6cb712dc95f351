use crate::bot::commands::watermark::WATERMARK_GROUP;
use crate::bot::commands::GENERAL_GROUP;
use anyhow::{Context, Result};
use serenity::framework::{Framework, StandardFramework};
use serenity::prelude::TypeMapKey;
use serenity::Client;
use std::sync::Arc;
use tokio::sync::RwLock;
use watermark_bot::preferences::ColorPreferences;
use watermark_bot::watermark::Compositor;
use watermark_bot::Config;

pub mod commands;
pub mod handler;
pub mod hooks;

/// The compositor together with what is sent alongside its output.
#[derive(Debug)]
pub struct Watermarker {
    pub compositor: Compositor,
    pub caption: String,
}

pub struct WatermarkerContainer;

impl TypeMapKey for WatermarkerContainer {
    type Value = Arc<Watermarker>;
}

pub struct PreferencesContainer;

impl TypeMapKey for PreferencesContainer {
    type Value = Arc<RwLock<ColorPreferences>>;
}

pub fn default_framework(cfg: &Config) -> StandardFramework {
    StandardFramework::new()
        .configure(|c| c.prefix(cfg.prefix.clone()))
        .before(hooks::before)
        .after(hooks::after)
        .group(&GENERAL_GROUP)
        .group(&WATERMARK_GROUP)
}

pub async fn default_client<F>(cfg: &Config, compositor: Compositor, framework: F) -> Result<Client>
where
    F: Framework + Send + Sync + 'static,
{
    let watermarker = Watermarker {
        compositor,
        caption: cfg.watermark.caption.clone(),
    };
    let preferences = ColorPreferences::new(cfg.watermark.default_color);

    Client::builder(&cfg.discord_api_key)
        .event_handler(handler::Handler::new(cfg.prefix.clone()))
        .framework(framework)
        .type_map_insert::<WatermarkerContainer>(Arc::new(watermarker))
        .type_map_insert::<PreferencesContainer>(Arc::new(RwLock::new(preferences)))
        .await
        .context("Failed to build client")
}

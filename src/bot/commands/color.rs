use crate::bot::PreferencesContainer;
use anyhow::{Context, Result};
use serenity::framework::standard::macros::command;
use serenity::framework::standard::{Args, CommandResult};
use serenity::model::prelude::*;
use serenity::prelude::Context as SContext;
use std::sync::Arc;
use tokio::sync::RwLock;
use watermark_bot::preferences::ColorPreferences;
use watermark_bot::watermark::NamedColor;

async fn preferences(ctx: &SContext) -> Result<Arc<RwLock<ColorPreferences>>> {
    let data = ctx.data.read().await;
    let preferences = data
        .get::<PreferencesContainer>()
        .cloned()
        .context("Colour preferences were not initialised")?;
    Ok(preferences)
}

/// The colour `user_id` picked, or the default if they never did.
pub(crate) async fn user_color(ctx: &SContext, user_id: u64) -> Result<NamedColor> {
    let preferences = preferences(ctx).await?;
    let color = preferences.read().await.get(user_id);
    Ok(color)
}

fn palette_listing(current: NamedColor) -> String {
    let choices = NamedColor::ALL
        .iter()
        .map(|c| {
            let marker = if *c == current { " ← current" } else { "" };
            format!("{} `{}`{}", c.emoji(), c, marker)
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("🎨 Pick a watermark colour with `color <name>`:\n{}", choices)
}

#[command]
#[aliases("colour")]
pub(crate) async fn color(ctx: &SContext, msg: &Message, args: Args) -> CommandResult {
    let requested = args.rest().trim();
    let user_id = msg.author.id.0;

    if requested.is_empty() {
        let current = user_color(ctx, user_id).await?;
        msg.reply(ctx, palette_listing(current)).await?;
        return Ok(());
    }

    let color = requested.parse::<NamedColor>()?;
    preferences(ctx).await?.write().await.set(user_id, color);
    msg.reply(ctx, format!("✅ Watermark colour set to {} {}", color.emoji(), color))
        .await?;
    Ok(())
}

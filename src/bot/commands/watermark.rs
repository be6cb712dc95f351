use crate::bot::commands::color::{user_color, COLOR_COMMAND};
use crate::bot::{Watermarker, WatermarkerContainer};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{error, warn};
use reqwest::get;
use serenity::client::Context as SContext;
use serenity::framework::standard::macros::{command, group};
use serenity::framework::standard::{Args, CommandResult};
use serenity::model::prelude::*;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;
use watermark_bot::watermark::{NamedColor, WatermarkError};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "tif", "tiff"];

#[derive(Debug, Parser)]
struct WatermarkOpt {
    /// Colour for this image only
    #[clap(short, long)]
    color: Option<NamedColor>,
    /// Seed for a reproducible tile layout
    #[clap(short, long)]
    seed: Option<u64>,
    /// Link to the image instead of an attachment
    #[clap(short, long)]
    image: Option<String>,
}

#[group]
#[commands(watermark, color)]
pub(crate) struct Watermark;

#[command]
#[aliases("wm")]
pub(crate) async fn watermark(ctx: &SContext, msg: &Message, mut args: Args) -> CommandResult {
    let mut to_parse = args.iter::<String>().collect::<Result<VecDeque<_>, _>>()?;
    to_parse.push_front("watermark".to_string());
    let opt = WatermarkOpt::try_parse_from(&to_parse)?;

    let color = match opt.color {
        Some(color) => color,
        None => user_color(ctx, msg.author.id.0).await?,
    };

    if let Some(url) = opt.image {
        let bytes = download_image(strip_angle_brackets(&url)).await?;
        watermark_and_reply(ctx, msg, bytes, color, opt.seed).await?;
        return Ok(());
    }

    let source = find_image_attachment(msg).or_else(|| {
        msg.referenced_message
            .as_deref()
            .and_then(find_image_attachment)
    });
    let attachment =
        source.ok_or_else(|| anyhow!("Attach an image, reply to one, or pass `-i <url>`"))?;
    watermark_attachment(ctx, msg, attachment, color, opt.seed).await?;
    Ok(())
}

fn has_image_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// First attachment on `msg` that looks like an image.
pub(crate) fn find_image_attachment(msg: &Message) -> Option<&Attachment> {
    msg.attachments
        .iter()
        .find(|a| a.width.is_some() || has_image_extension(&a.filename))
}

fn strip_angle_brackets(url: &str) -> &str {
    url.strip_prefix('<')
        .and_then(|u| u.strip_suffix('>'))
        .unwrap_or(url)
}

async fn download_image(url: &str) -> Result<Vec<u8>> {
    let response = get(url)
        .await
        .with_context(|| anyhow!("Failed to get response from {}", url))?
        .error_for_status()
        .with_context(|| anyhow!("Server refused to send {}", url))?;
    let bytes = response
        .bytes()
        .await
        .context("Failed to get bytes from GET response")?;
    Ok(bytes.to_vec())
}

pub(crate) async fn watermark_attachment(
    ctx: &SContext,
    msg: &Message,
    attachment: &Attachment,
    color: NamedColor,
    seed: Option<u64>,
) -> Result<()> {
    let bytes = attachment
        .download()
        .await
        .with_context(|| anyhow!("Failed to download attachment {}", attachment.filename))?;
    watermark_and_reply(ctx, msg, bytes, color, seed).await
}

async fn watermarker(ctx: &SContext) -> Result<Arc<Watermarker>> {
    let data = ctx.data.read().await;
    let watermarker = data
        .get::<WatermarkerContainer>()
        .cloned()
        .context("Watermarker was not initialised")?;
    Ok(watermarker)
}

/// Reply for a posted image that failed before the compositor could report.
pub(crate) const UNEXPECTED_FAILURE: &str =
    "⚠️ Sorry, an unexpected error occurred while processing your image.";

/// What the user is told when their image could not be watermarked.
fn user_message(error: &WatermarkError) -> &'static str {
    match error {
        WatermarkError::Decode(_) => {
            "❌ I couldn't read that file as an image. Please send a JPEG or PNG photo."
        }
        _ => "❌ Sorry, something went wrong while adding the watermark. Please try again later.",
    }
}

/// Run the compositor off the async runtime and answer `msg` with the result.
///
/// Watermarking failures are reported to the user and logged, not returned.
async fn watermark_and_reply(
    ctx: &SContext,
    msg: &Message,
    bytes: Vec<u8>,
    color: NamedColor,
    seed: Option<u64>,
) -> Result<()> {
    let watermarker = watermarker(ctx).await?;
    let reaction = match msg.react(ctx, '🕐').await {
        Ok(reaction) => Some(reaction),
        Err(e) => {
            warn!("Failed to add progress reaction: {:?}", e);
            None
        }
    };

    let job = Arc::clone(&watermarker);
    let result =
        tokio::task::spawn_blocking(move || job.compositor.composite(&bytes, color, seed)).await;

    if let Some(reaction) = reaction {
        if let Err(e) = reaction.delete(ctx).await {
            warn!("Failed to remove progress reaction: {:?}", e);
        }
    }
    let result = result.context("Watermark task panicked")?;

    match result {
        Ok(jpeg) => {
            respond_with_image(ctx, msg, &watermarker.caption, &jpeg).await?;
        }
        Err(e) => {
            error!("Failed to watermark image from {}: {}", msg.author.tag(), e);
            msg.reply(ctx, user_message(&e)).await?;
        }
    }
    Ok(())
}

async fn respond_with_image(
    ctx: &SContext,
    msg: &Message,
    caption: &str,
    jpeg: &[u8],
) -> Result<Message> {
    let dir = tempdir().context("Could not create temporary directory")?;
    let file = dir.path().join(format!("watermarked_{}.jpg", msg.id.0));
    std::fs::write(&file, jpeg).context("Failed to save image")?;

    let files = vec![file];
    msg.channel_id
        .send_files(ctx, &files, |m| {
            m.content(caption);
            m.reference_message(msg);
            m.allowed_mentions(|a| a.empty_users())
        })
        .await
        .context("Failed to send message")
}

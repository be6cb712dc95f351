use crate::bot::commands::watermark::{
    find_image_attachment, watermark_attachment, UNEXPECTED_FAILURE,
};
use log::{error, info};
use serenity::client::Context;
use serenity::model::prelude::*;
use serenity::{async_trait, client::EventHandler};

/// Watermarks any image posted outside of a command.
pub(crate) struct Handler {
    prefix: String,
}

impl Handler {
    pub(crate) fn new(prefix: String) -> Self {
        Self { prefix }
    }

    fn wants(&self, msg: &Message) -> bool {
        !msg.author.bot && !msg.content.starts_with(&self.prefix)
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Connected as {}", ready.user.name);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if !self.wants(&msg) {
            return;
        }
        let attachment = match find_image_attachment(&msg) {
            Some(attachment) => attachment,
            None => return,
        };

        info!(
            "Watermarking '{}' posted by {}",
            attachment.filename,
            msg.author.tag()
        );
        let result = match crate::bot::commands::color::user_color(&ctx, msg.author.id.0).await {
            Ok(color) => watermark_attachment(&ctx, &msg, attachment, color, None).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            error!("Failed to watermark image from {}: {:?}", msg.author.tag(), e);
            reply_failure(&ctx, &msg).await;
        }
    }
}

async fn reply_failure(ctx: &Context, msg: &Message) {
    if let Err(e) = msg.reply(ctx, UNEXPECTED_FAILURE).await {
        error!("Failed to send error message to {}: {:?}", msg.author.tag(), e);
    }
}

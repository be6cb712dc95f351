pub mod color;
pub mod watermark;

use serenity::framework::standard::macros::{command, group};
use serenity::framework::standard::CommandResult;
use serenity::model::prelude::*;
use serenity::prelude::*;

#[group]
#[commands(ping, start)]
pub(crate) struct General;

#[command]
pub(crate) async fn ping(ctx: &Context, msg: &Message) -> CommandResult {
    msg.reply(ctx, "🏓").await?;
    Ok(())
}

#[command]
#[aliases("help")]
pub(crate) async fn start(ctx: &Context, msg: &Message) -> CommandResult {
    let welcome = "\
📸 I add a watermark to every image you send me so your photos stay yours.

⚙️ **How to use me**
1. Send an image and I'll reply with a watermarked copy (black by default).
2. Use `color <name>` to change the watermark colour, or `color` to see the choices.
3. Use `watermark -c <color> -i <url>` to watermark an image from a link or pick a colour just this once.";
    msg.reply(ctx, welcome).await?;
    Ok(())
}

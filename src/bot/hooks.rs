use log::{error, info};
use serenity::framework::standard::macros::hook;
use serenity::framework::standard::{CommandError, CommandResult};
use serenity::model::prelude::*;
use serenity::prelude::*;

#[hook]
pub(crate) async fn before(_ctx: &Context, msg: &Message, cmd_name: &str) -> bool {
    info!(
        "Calling command '{cmd_name}' (invoked by {} in channel {}, {} attachment(s))",
        msg.author.tag(),
        msg.channel_id.0,
        msg.attachments.len()
    );

    true
}

/// Text shown to the user for a failed command.
///
/// Option parsing errors already carry usage text, so they are shown as a
/// code block to keep Discord from mangling the layout.
fn error_reply(e: &CommandError) -> String {
    match e.downcast_ref::<clap::Error>() {
        Some(usage) => format!("```\n{}\n```", usage.to_string().trim_end()),
        None => format!("⚠️ {}", e),
    }
}

#[hook]
pub(crate) async fn after(
    ctx: &Context,
    msg: &Message,
    command_name: &str,
    command_result: CommandResult,
) {
    match command_result {
        Ok(()) => info!("Processed command '{}'", command_name),
        Err(e) => {
            error!("Command '{}' returned error {:?}", command_name, e);
            if let Err(e) = msg.reply(ctx, error_reply(&e)).await {
                error!(
                    "Failed to send error message for command '{}': {:?}",
                    command_name, e
                );
            };
        }
    }
}

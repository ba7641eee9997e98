use teloxide::prelude::*;
use std::error::Error;

use crate::dialogue::{CommandName, ConversationEvent, DialogueController};
use crate::handlers::utils::display_name;
use crate::Command;

pub async fn command_handler(
    msg: Message,
    cmd: Command,
    controller: DialogueController,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let name = match cmd {
        Command::Start => CommandName::Start,
        Command::Location => CommandName::Location,
        Command::Forecast => CommandName::Forecast,
        Command::Help => CommandName::Help,
        Command::Author => CommandName::Author,
    };

    let display_name = msg
        .from
        .as_ref()
        .map(display_name)
        .unwrap_or_else(|| "друг".to_string());

    controller
        .handle_event(ConversationEvent::Command {
            name,
            chat_id: msg.chat.id,
            display_name,
        })
        .await?;

    Ok(())
}

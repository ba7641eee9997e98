use teloxide::prelude::*;
use std::error::Error;

use crate::config::AppConfig;
use crate::dialogue::{ConversationEvent, DialogueController};
use crate::handlers::utils::display_name;

/// В личке бот отвечает на всё, в группах только на упоминания
/// и на ответы к собственным сообщениям.
fn is_addressed_to_bot(msg: &Message, bot_username: Option<&str>) -> bool {
    if msg.chat.is_private() {
        return true;
    }
    let Some(username) = bot_username else {
        return false;
    };
    let mentioned = msg
        .text()
        .map_or(false, |text| text.contains(&format!("@{username}")));
    let replied_to_bot = msg
        .reply_to_message()
        .and_then(|reply| reply.from.as_ref())
        .and_then(|from| from.username.as_deref())
        .map_or(false, |from| from == username);
    mentioned || replied_to_bot
}

fn strip_mention(text: &str, bot_username: Option<&str>) -> String {
    match bot_username {
        Some(username) => text.replace(&format!("@{username}"), "").trim().to_string(),
        None => text.trim().to_string(),
    }
}

pub async fn message_handler(
    msg: Message,
    controller: DialogueController,
    config: AppConfig,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if !is_addressed_to_bot(&msg, config.bot_username.as_deref()) {
        return Ok(());
    }

    let display_name = msg
        .from
        .as_ref()
        .map(display_name)
        .unwrap_or_else(|| "друг".to_string());

    let event = if let Some(text) = msg.text() {
        // Команды уже обработаны в command_handler
        if text.starts_with('/') {
            return Ok(());
        }
        let text = strip_mention(text, config.bot_username.as_deref());
        if text.is_empty() {
            return Ok(());
        }
        ConversationEvent::FreeText {
            chat_id: msg.chat.id,
            message_id: msg.id,
            display_name,
            text,
        }
    } else if let Some(location) = msg.location() {
        ConversationEvent::LocationShared {
            chat_id: msg.chat.id,
            message_id: msg.id,
            display_name,
            latitude: location.latitude,
            longitude: location.longitude,
        }
    } else {
        // Фото, голосовые, документы и прочий неподдерживаемый контент
        ConversationEvent::UnsupportedContent {
            chat_id: msg.chat.id,
            message_id: msg.id,
        }
    };

    controller.handle_event(event).await?;

    Ok(())
}

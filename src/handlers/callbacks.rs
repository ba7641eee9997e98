use teloxide::prelude::*;
use std::error::Error;

use crate::dialogue::{ConversationEvent, DialogueController};
use crate::handlers::utils::display_name;

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    controller: DialogueController,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    // Убираем "часики" на кнопке независимо от исхода
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };

    controller
        .handle_event(ConversationEvent::ButtonPressed {
            chat_id: message.chat().id,
            display_name: display_name(&q.from),
            action_id: data.to_string(),
        })
        .await?;

    Ok(())
}

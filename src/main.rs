use std::sync::Arc;

use teloxide::update_listeners::webhooks;
use teloxide::{prelude::*, utils::command::BotCommands};

mod classifier;
mod config;
mod delivery;
mod dialogue;
mod formatter;
mod handlers;
mod texts;
mod weather;

use crate::config::AppConfig;
use crate::delivery::{RetryPolicy, TelegramDelivery};
use crate::dialogue::DialogueController;
use crate::handlers::{callback_handler, command_handler, message_handler};
use crate::weather::owm::OwmGateway;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
enum Command {
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "погода по местоположению")]
    Location,
    #[command(description = "прогноз на 5 дней")]
    Forecast,
    #[command(description = "показать помощь")]
    Help,
    #[command(description = "информация об авторе")]
    Author,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Загружаем .env и инициализируем логирование
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Starting weather bot...");

    let config = AppConfig::from_env()?;

    let bot = Bot::from_env();

    let gateway = Arc::new(OwmGateway::new(
        config.owm_key.clone(),
        config.locale.clone(),
        config.forecast_days,
    ));
    let delivery = Arc::new(TelegramDelivery::new(
        bot.clone(),
        RetryPolicy::unbounded(config.send_retry_delay),
    ));
    let controller = DialogueController::new(gateway, delivery, config.locale.clone());

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(Update::filter_message().endpoint(message_handler));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![controller, config.clone()])
        .enable_ctrlc_handler()
        .build();

    match config.webhook {
        Some(webhook) => {
            log::info!("🚀 Starting dispatcher with webhook on port {}...", webhook.port);
            let addr = ([0, 0, 0, 0], webhook.port).into();
            let mut options = webhooks::Options::new(addr, webhook.url);
            if let Some(secret) = webhook.secret {
                options = options.secret_token(secret);
            }
            let listener = webhooks::axum(bot, options).await?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await;
        }
        None => {
            log::info!("🚀 Starting dispatcher with long polling...");
            dispatcher.dispatch().await;
        }
    }

    Ok(())
}

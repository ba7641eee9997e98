//! Отправка сообщений в Telegram с повтором при сетевых сбоях.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, FileId, InputFile, MessageId, ParseMode, ReplyMarkup, ReplyParameters};
use teloxide::RequestError;

/// Пауза между action "typing" и самим сообщением.
pub const TYPING_PAUSE: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("telegram request failed: {0}")]
    Request(#[from] RequestError),
}

/// Политика повторов доставки.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: Option<u32>,
    delay: Duration,
}

impl RetryPolicy {
    /// Повторять до успеха либо до неустранимой ошибки.
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            max_attempts: None,
            delay,
        }
    }

    pub fn bounded(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            delay,
        }
    }

    fn allows_retry(&self, attempt: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }

    /// Повторяет операцию, пока ошибка сетевая. Ошибки API
    /// (заблокирован, некорректный chat_id) возвращаются сразу.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, DeliveryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RequestError>>,
    {
        let mut attempt: u32 = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if is_transient(&err) && self.allows_retry(attempt) => {
                    log::warn!("Send attempt {attempt} failed, retrying: {err}");
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

fn is_transient(err: &RequestError) -> bool {
    matches!(
        err,
        RequestError::Network(_) | RequestError::Io(_) | RequestError::RetryAfter(_)
    )
}

/// Исходящий канал бота. Абстрагирован для тестов диалога.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: String,
        keyboard: Option<ReplyMarkup>,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), DeliveryError>;

    async fn reply_text(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        text: String,
        keyboard: Option<ReplyMarkup>,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), DeliveryError>;

    async fn send_sticker(
        &self,
        chat_id: ChatId,
        file_id: &str,
        reply_to: Option<MessageId>,
        keyboard: Option<ReplyMarkup>,
    ) -> Result<(), DeliveryError>;
}

/// Случайный стикер из набора.
pub fn pick_sticker(pool: &[&'static str]) -> &'static str {
    pool.choose(&mut rand::thread_rng()).copied().unwrap_or("")
}

pub struct TelegramDelivery {
    bot: Bot,
    retry: RetryPolicy,
}

impl TelegramDelivery {
    pub fn new(bot: Bot, retry: RetryPolicy) -> Self {
        Self { bot, retry }
    }

    async fn show_typing(&self, chat_id: ChatId) {
        // Недоставленный action не повод ломать ответ
        if let Err(e) = self.bot.send_chat_action(chat_id, ChatAction::Typing).await {
            log::warn!("Failed to send typing action: {e}");
        }
        tokio::time::sleep(TYPING_PAUSE).await;
    }
}

#[async_trait]
impl DeliveryChannel for TelegramDelivery {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: String,
        keyboard: Option<ReplyMarkup>,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), DeliveryError> {
        self.show_typing(chat_id).await;
        self.retry
            .run(|| {
                let mut request = self.bot.send_message(chat_id, text.clone());
                if let Some(mode) = parse_mode {
                    request = request.parse_mode(mode);
                }
                if let Some(markup) = keyboard.clone() {
                    request = request.reply_markup(markup);
                }
                async move { request.await.map(|_| ()) }
            })
            .await
    }

    async fn reply_text(
        &self,
        chat_id: ChatId,
        reply_to: MessageId,
        text: String,
        keyboard: Option<ReplyMarkup>,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), DeliveryError> {
        self.show_typing(chat_id).await;
        self.retry
            .run(|| {
                let mut request = self
                    .bot
                    .send_message(chat_id, text.clone())
                    .reply_parameters(ReplyParameters::new(reply_to));
                if let Some(mode) = parse_mode {
                    request = request.parse_mode(mode);
                }
                if let Some(markup) = keyboard.clone() {
                    request = request.reply_markup(markup);
                }
                async move { request.await.map(|_| ()) }
            })
            .await
    }

    async fn send_sticker(
        &self,
        chat_id: ChatId,
        file_id: &str,
        reply_to: Option<MessageId>,
        keyboard: Option<ReplyMarkup>,
    ) -> Result<(), DeliveryError> {
        self.show_typing(chat_id).await;
        self.retry
            .run(|| {
                let sticker = InputFile::file_id(FileId(file_id.to_string()));
                let mut request = self.bot.send_sticker(chat_id, sticker);
                if let Some(message_id) = reply_to {
                    request = request.reply_parameters(ReplyParameters::new(message_id));
                }
                if let Some(markup) = keyboard.clone() {
                    request = request.reply_markup(markup);
                }
                async move { request.await.map(|_| ()) }
            })
            .await
    }
}

//! Диалоговая логика бота: команды, свободный текст, кнопки.
//!
//! Контроллер не знает про транспорт Telegram напрямую, всё уходит
//! через [`DeliveryChannel`], погода приходит через [`WeatherGateway`].

use std::collections::HashMap;
use std::sync::Arc;

use teloxide::types::{ChatId, MessageId, ParseMode};
use tokio::sync::RwLock;

use crate::classifier::{classify, InputClass, SENTINEL_PLACEHOLDER};
use crate::delivery::{pick_sticker, DeliveryChannel, DeliveryError};
use crate::formatter;
use crate::handlers::utils;
use crate::texts;
use crate::weather::{GatewayError, WeatherGateway, WeatherQuery};

/// Команды меню бота.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
    Start,
    Location,
    Forecast,
    Help,
    Author,
}

/// Входящее событие диалога, уже очищенное от транспортных деталей.
#[derive(Debug, Clone)]
pub enum ConversationEvent {
    Command {
        name: CommandName,
        chat_id: ChatId,
        display_name: String,
    },
    FreeText {
        chat_id: ChatId,
        message_id: MessageId,
        display_name: String,
        text: String,
    },
    LocationShared {
        chat_id: ChatId,
        message_id: MessageId,
        display_name: String,
        latitude: f64,
        longitude: f64,
    },
    ButtonPressed {
        chat_id: ChatId,
        display_name: String,
        action_id: String,
    },
    UnsupportedContent {
        chat_id: ChatId,
        message_id: MessageId,
    },
}

/// Отложенное ожидание следующего сообщения в чате.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationToken {
    /// Следующий ввод чата трактуется как город/локация для прогноза.
    ForecastInput,
}

/// Одноразовые продолжения, не больше одного на чат.
/// Новая регистрация молча затирает старую.
#[derive(Clone, Default)]
pub struct PendingContinuations(Arc<RwLock<HashMap<ChatId, ContinuationToken>>>);

impl PendingContinuations {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, chat_id: ChatId, token: ContinuationToken) {
        self.0.write().await.insert(chat_id, token);
    }

    /// Снимает и возвращает продолжение: каждое срабатывает ровно один раз.
    pub async fn take(&self, chat_id: ChatId) -> Option<ContinuationToken> {
        self.0.write().await.remove(&chat_id)
    }

    pub async fn is_pending(&self, chat_id: ChatId) -> bool {
        self.0.read().await.contains_key(&chat_id)
    }
}

/// Какой из двух режимов запроса обслуживается.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LookupMode {
    Current,
    Forecast,
}

#[derive(Clone)]
pub struct DialogueController {
    gateway: Arc<dyn WeatherGateway>,
    delivery: Arc<dyn DeliveryChannel>,
    continuations: PendingContinuations,
    locale: String,
}

impl DialogueController {
    pub fn new(
        gateway: Arc<dyn WeatherGateway>,
        delivery: Arc<dyn DeliveryChannel>,
        locale: String,
    ) -> Self {
        Self {
            gateway,
            delivery,
            continuations: PendingContinuations::new(),
            locale,
        }
    }

    pub async fn handle_event(&self, event: ConversationEvent) -> Result<(), DeliveryError> {
        match event {
            ConversationEvent::Command {
                name,
                chat_id,
                display_name,
            } => self.handle_command(name, chat_id, &display_name).await,
            ConversationEvent::FreeText {
                chat_id,
                message_id,
                display_name,
                text,
            } => {
                self.handle_free_text(chat_id, message_id, &display_name, &text)
                    .await
            }
            ConversationEvent::LocationShared {
                chat_id,
                message_id,
                display_name,
                latitude,
                longitude,
            } => {
                self.handle_location(chat_id, message_id, &display_name, latitude, longitude)
                    .await
            }
            ConversationEvent::ButtonPressed {
                chat_id,
                display_name,
                action_id,
            } => self.handle_button(chat_id, &display_name, &action_id).await,
            ConversationEvent::UnsupportedContent {
                chat_id,
                message_id,
            } => self.handle_unsupported(chat_id, message_id).await,
        }
    }

    async fn handle_command(
        &self,
        name: CommandName,
        chat_id: ChatId,
        display_name: &str,
    ) -> Result<(), DeliveryError> {
        match name {
            CommandName::Start => {
                self.delivery
                    .send_sticker(chat_id, texts::STICKER_START, None, None)
                    .await?;
                self.delivery
                    .send_text(
                        chat_id,
                        texts::start_message(display_name),
                        Some(utils::current_error_keyboard()),
                        None,
                    )
                    .await
            }
            CommandName::Help => {
                self.delivery
                    .send_sticker(chat_id, texts::STICKER_HELP, None, None)
                    .await?;
                self.delivery
                    .send_text(
                        chat_id,
                        texts::help_message(display_name),
                        Some(utils::current_error_keyboard()),
                        Some(ParseMode::Html),
                    )
                    .await
            }
            CommandName::Author => {
                self.delivery
                    .send_sticker(chat_id, texts::STICKER_AUTHOR, None, None)
                    .await?;
                self.delivery
                    .send_text(
                        chat_id,
                        texts::AUTHOR_INFO.to_string(),
                        Some(utils::current_error_keyboard()),
                        Some(ParseMode::Html),
                    )
                    .await
            }
            CommandName::Location => {
                self.delivery
                    .send_text(
                        chat_id,
                        texts::press_location_button(display_name),
                        Some(utils::location_keyboard()),
                        None,
                    )
                    .await
            }
            CommandName::Forecast => {
                self.continuations
                    .register(chat_id, ContinuationToken::ForecastInput)
                    .await;
                self.delivery
                    .send_text(
                        chat_id,
                        texts::enter_city_or_location(display_name),
                        Some(utils::location_keyboard()),
                        None,
                    )
                    .await
            }
        }
    }

    async fn handle_free_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        display_name: &str,
        text: &str,
    ) -> Result<(), DeliveryError> {
        let mode = match self.continuations.take(chat_id).await {
            Some(ContinuationToken::ForecastInput) => LookupMode::Forecast,
            None => LookupMode::Current,
        };

        // Доступность сервиса проверяется до разбора ввода
        if !self.gateway.is_live().await {
            return self.send_service_unavailable(chat_id, display_name).await;
        }

        match classify(text) {
            InputClass::EmojiOnly => {
                self.delivery
                    .send_sticker(
                        chat_id,
                        pick_sticker(texts::WRONG_CONTENT_STICKERS),
                        Some(message_id),
                        None,
                    )
                    .await
            }
            InputClass::NonLatinScript => {
                self.send_cyrillic_error(chat_id, display_name, mode).await
            }
            InputClass::Sentinel => {
                self.send_not_found(chat_id, SENTINEL_PLACEHOLDER, mode)
                    .await
            }
            InputClass::Lookup => match WeatherQuery::by_place(text) {
                Ok(query) => {
                    self.run_lookup(chat_id, message_id, display_name, &query, text, mode)
                        .await
                }
                Err(_) => {
                    self.send_not_found(chat_id, &formatter::capitalize(text), mode)
                        .await
                }
            },
        }
    }

    async fn handle_location(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        display_name: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), DeliveryError> {
        let mode = match self.continuations.take(chat_id).await {
            Some(ContinuationToken::ForecastInput) => LookupMode::Forecast,
            None => LookupMode::Current,
        };

        if !self.gateway.is_live().await {
            return self.send_service_unavailable(chat_id, display_name).await;
        }

        match WeatherQuery::by_coords(latitude, longitude) {
            Ok(query) => {
                self.run_lookup(
                    chat_id,
                    message_id,
                    display_name,
                    &query,
                    SENTINEL_PLACEHOLDER,
                    mode,
                )
                .await
            }
            Err(_) => {
                self.send_not_found(chat_id, SENTINEL_PLACEHOLDER, mode)
                    .await
            }
        }
    }

    async fn handle_button(
        &self,
        chat_id: ChatId,
        display_name: &str,
        action_id: &str,
    ) -> Result<(), DeliveryError> {
        match action_id {
            "location" => {
                self.handle_command(CommandName::Location, chat_id, display_name)
                    .await
            }
            "forecast" => {
                self.handle_command(CommandName::Forecast, chat_id, display_name)
                    .await
            }
            "help" => {
                self.handle_command(CommandName::Help, chat_id, display_name)
                    .await
            }
            "author" => {
                self.handle_command(CommandName::Author, chat_id, display_name)
                    .await
            }
            "forecast_help" => {
                self.continuations
                    .register(chat_id, ContinuationToken::ForecastInput)
                    .await;
                self.delivery
                    .send_sticker(chat_id, texts::STICKER_HELP, None, None)
                    .await?;
                self.delivery
                    .send_text(
                        chat_id,
                        texts::forecast_help_message(display_name),
                        None,
                        Some(ParseMode::Html),
                    )
                    .await
            }
            "forecast_author" => {
                self.continuations
                    .register(chat_id, ContinuationToken::ForecastInput)
                    .await;
                self.delivery
                    .send_sticker(chat_id, texts::STICKER_AUTHOR, None, None)
                    .await?;
                self.delivery
                    .send_text(
                        chat_id,
                        texts::AUTHOR_INFO.to_string(),
                        None,
                        Some(ParseMode::Html),
                    )
                    .await
            }
            other => {
                // Неизвестный callback игнорируется без ответа
                log::debug!("Ignoring unknown callback action: {other}");
                Ok(())
            }
        }
    }

    async fn handle_unsupported(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), DeliveryError> {
        // Продолжение чата не трогаем: фото не отменяет ожидание города
        self.delivery
            .send_sticker(
                chat_id,
                pick_sticker(texts::WRONG_CONTENT_STICKERS),
                Some(message_id),
                None,
            )
            .await
    }

    async fn run_lookup(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        display_name: &str,
        query: &WeatherQuery,
        echo_input: &str,
        mode: LookupMode,
    ) -> Result<(), DeliveryError> {
        let outcome = match mode {
            LookupMode::Current => self
                .gateway
                .lookup_current(query)
                .await
                .map(|weather| formatter::format_current(display_name, &weather, &self.locale)),
            LookupMode::Forecast => self
                .gateway
                .lookup_forecast(query)
                .await
                .map(|forecast| formatter::format_forecast(display_name, &forecast, &self.locale)),
        };

        match outcome {
            Ok(answer) => {
                self.delivery
                    .reply_text(
                        chat_id,
                        message_id,
                        answer,
                        Some(utils::remove_keyboard()),
                        Some(ParseMode::Html),
                    )
                    .await
            }
            Err(GatewayError::NotFound) | Err(GatewayError::InvalidQuery(_)) => {
                self.send_not_found(chat_id, &formatter::capitalize(echo_input), mode)
                    .await
            }
            Err(GatewayError::Upstream(details)) => {
                log::error!("Weather lookup failed for chat {chat_id}: {details}");
                self.send_not_found(chat_id, &formatter::capitalize(echo_input), mode)
                    .await
            }
        }
    }

    async fn send_cyrillic_error(
        &self,
        chat_id: ChatId,
        display_name: &str,
        mode: LookupMode,
    ) -> Result<(), DeliveryError> {
        let (text, keyboard) = match mode {
            LookupMode::Current => (
                texts::cyrillic_error(display_name),
                utils::current_error_keyboard(),
            ),
            LookupMode::Forecast => {
                self.continuations
                    .register(chat_id, ContinuationToken::ForecastInput)
                    .await;
                (
                    texts::forecast_cyrillic_error(display_name),
                    utils::forecast_error_keyboard(),
                )
            }
        };
        self.delivery
            .send_text(chat_id, text, Some(keyboard), None)
            .await?;
        self.delivery
            .send_sticker(chat_id, texts::STICKER_CYRILLIC_ERROR, None, None)
            .await
    }

    async fn send_not_found(
        &self,
        chat_id: ChatId,
        city: &str,
        mode: LookupMode,
    ) -> Result<(), DeliveryError> {
        let (text, keyboard) = match mode {
            LookupMode::Current => (
                texts::city_not_found(city),
                utils::current_error_keyboard(),
            ),
            LookupMode::Forecast => {
                self.continuations
                    .register(chat_id, ContinuationToken::ForecastInput)
                    .await;
                (
                    texts::forecast_city_not_found(city),
                    utils::forecast_error_keyboard(),
                )
            }
        };
        self.delivery
            .send_text(chat_id, text, Some(keyboard), Some(ParseMode::Html))
            .await?;
        self.delivery
            .send_sticker(chat_id, texts::STICKER_CITY_NOT_FOUND, None, None)
            .await
    }

    async fn send_service_unavailable(
        &self,
        chat_id: ChatId,
        display_name: &str,
    ) -> Result<(), DeliveryError> {
        self.delivery
            .send_text(chat_id, texts::service_unavailable(display_name), None, None)
            .await?;
        self.delivery
            .send_sticker(chat_id, pick_sticker(texts::ERROR_STICKERS), None, None)
            .await
    }

    #[cfg(test)]
    pub(crate) fn continuations(&self) -> &PendingContinuations {
        &self.continuations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex;
    use teloxide::types::ReplyMarkup;

    use crate::weather::{ForecastResult, WeatherResult};

    #[derive(Debug, PartialEq)]
    enum Sent {
        Text {
            text: String,
            has_keyboard: bool,
            html: bool,
        },
        Reply {
            reply_to: MessageId,
            text: String,
            html: bool,
        },
        Sticker {
            file_id: String,
            reply_to: Option<MessageId>,
        },
    }

    #[derive(Default)]
    struct RecordingDelivery {
        sent: Mutex<Vec<Sent>>,
    }

    impl RecordingDelivery {
        fn take_sent(&self) -> Vec<Sent> {
            std::mem::take(&mut self.sent.lock().unwrap())
        }
    }

    #[async_trait]
    impl DeliveryChannel for RecordingDelivery {
        async fn send_text(
            &self,
            _chat_id: ChatId,
            text: String,
            keyboard: Option<ReplyMarkup>,
            parse_mode: Option<ParseMode>,
        ) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(Sent::Text {
                text,
                has_keyboard: keyboard.is_some(),
                html: parse_mode == Some(ParseMode::Html),
            });
            Ok(())
        }

        async fn reply_text(
            &self,
            _chat_id: ChatId,
            reply_to: MessageId,
            text: String,
            _keyboard: Option<ReplyMarkup>,
            parse_mode: Option<ParseMode>,
        ) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(Sent::Reply {
                reply_to,
                text,
                html: parse_mode == Some(ParseMode::Html),
            });
            Ok(())
        }

        async fn send_sticker(
            &self,
            _chat_id: ChatId,
            file_id: &str,
            reply_to: Option<MessageId>,
            _keyboard: Option<ReplyMarkup>,
        ) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(Sent::Sticker {
                file_id: file_id.to_string(),
                reply_to,
            });
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockGateway {
        offline: AtomicBool,
        not_found: AtomicBool,
        current_calls: AtomicU32,
        forecast_calls: AtomicU32,
    }

    impl MockGateway {
        fn current_fixture() -> WeatherResult {
            WeatherResult {
                location_name: "Kharkiv".to_string(),
                country: Some("UA".to_string()),
                region: None,
                timezone_name: "Europe/Kyiv".to_string(),
                icon_code: "01d".to_string(),
                status_text: "clear sky".to_string(),
                temp_c: 20,
                pressure_mmhg: 750,
                humidity_pct: 40,
                wind_speed: 3,
                observed_at_local: NaiveDate::from_ymd_opt(2026, 8, 29)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
            }
        }

        fn forecast_fixture() -> ForecastResult {
            ForecastResult {
                location_name: "Kharkiv".to_string(),
                country: Some("UA".to_string()),
                region: None,
                timezone_name: "Europe/Kyiv".to_string(),
                days: vec![crate::weather::DaySummary {
                    date_local: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
                    temp_min: 10,
                    temp_max: 18,
                    pressure_avg: 748,
                    humidity_avg: 50,
                    wind_speed_avg: 4,
                    dominant_status: "clear sky".to_string(),
                    dominant_icon: "01d".to_string(),
                }],
            }
        }
    }

    #[async_trait]
    impl WeatherGateway for MockGateway {
        async fn lookup_current(
            &self,
            _query: &WeatherQuery,
        ) -> Result<WeatherResult, GatewayError> {
            self.current_calls.fetch_add(1, Ordering::SeqCst);
            if self.not_found.load(Ordering::SeqCst) {
                Err(GatewayError::NotFound)
            } else {
                Ok(Self::current_fixture())
            }
        }

        async fn lookup_forecast(
            &self,
            _query: &WeatherQuery,
        ) -> Result<ForecastResult, GatewayError> {
            self.forecast_calls.fetch_add(1, Ordering::SeqCst);
            if self.not_found.load(Ordering::SeqCst) {
                Err(GatewayError::NotFound)
            } else {
                Ok(Self::forecast_fixture())
            }
        }

        async fn is_live(&self) -> bool {
            !self.offline.load(Ordering::SeqCst)
        }
    }

    const CHAT: ChatId = ChatId(42);
    const MSG: MessageId = MessageId(7);

    fn controller() -> (Arc<MockGateway>, Arc<RecordingDelivery>, DialogueController) {
        let gateway = Arc::new(MockGateway::default());
        let delivery = Arc::new(RecordingDelivery::default());
        let controller = DialogueController::new(
            gateway.clone(),
            delivery.clone(),
            "ru".to_string(),
        );
        (gateway, delivery, controller)
    }

    fn free_text(text: &str) -> ConversationEvent {
        ConversationEvent::FreeText {
            chat_id: CHAT,
            message_id: MSG,
            display_name: "Eugene".to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn city_lookup_replies_with_html() {
        let (gateway, delivery, controller) = controller();
        controller.handle_event(free_text("Kharkiv")).await.unwrap();

        let sent = delivery.take_sent();
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            Sent::Reply { reply_to, text, html } => {
                assert_eq!(*reply_to, MSG);
                assert!(*html);
                assert!(text.contains("<b>Kharkiv</b>"));
            }
            other => panic!("unexpected delivery: {other:?}"),
        }
        assert_eq!(gateway.current_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.forecast_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn forecast_continuation_is_one_shot() {
        let (gateway, _delivery, controller) = controller();
        controller
            .handle_event(ConversationEvent::Command {
                name: CommandName::Forecast,
                chat_id: CHAT,
                display_name: "Eugene".to_string(),
            })
            .await
            .unwrap();
        assert!(controller.continuations().is_pending(CHAT).await);

        // первый текст идёт в прогноз и снимает продолжение
        controller.handle_event(free_text("Kharkiv")).await.unwrap();
        assert_eq!(gateway.forecast_calls.load(Ordering::SeqCst), 1);
        assert!(!controller.continuations().is_pending(CHAT).await);

        // следующий текст уже обычный запрос
        controller.handle_event(free_text("Kharkiv")).await.unwrap();
        assert_eq!(gateway.forecast_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.current_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cyrillic_in_forecast_rearms_continuation() {
        let (gateway, delivery, controller) = controller();
        controller
            .continuations()
            .register(CHAT, ContinuationToken::ForecastInput)
            .await;

        controller.handle_event(free_text("Харків")).await.unwrap();

        assert_eq!(gateway.forecast_calls.load(Ordering::SeqCst), 0);
        assert!(controller.continuations().is_pending(CHAT).await);
        let sent = delivery.take_sent();
        assert!(matches!(&sent[0], Sent::Text { has_keyboard: true, .. }));
        assert!(matches!(
            &sent[1],
            Sent::Sticker { file_id, .. } if file_id == texts::STICKER_CYRILLIC_ERROR
        ));
    }

    #[tokio::test]
    async fn cyrillic_in_current_mode_does_not_arm_continuation() {
        let (gateway, _delivery, controller) = controller();
        controller.handle_event(free_text("Харків")).await.unwrap();
        assert_eq!(gateway.current_calls.load(Ordering::SeqCst), 0);
        assert!(!controller.continuations().is_pending(CHAT).await);
    }

    #[tokio::test]
    async fn offline_service_short_circuits_everything() {
        let (gateway, delivery, controller) = controller();
        gateway.offline.store(true, Ordering::SeqCst);
        controller
            .continuations()
            .register(CHAT, ContinuationToken::ForecastInput)
            .await;

        controller.handle_event(free_text("Харків")).await.unwrap();

        // ни запроса, ни повторной регистрации, только извинение
        assert_eq!(gateway.current_calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.forecast_calls.load(Ordering::SeqCst), 0);
        assert!(!controller.continuations().is_pending(CHAT).await);
        let sent = delivery.take_sent();
        assert!(matches!(&sent[0], Sent::Text { text, .. } if text.contains("не доступен")));
        assert!(matches!(&sent[1], Sent::Sticker { .. }));
    }

    #[tokio::test]
    async fn emoji_only_never_reaches_gateway() {
        let (gateway, delivery, controller) = controller();
        controller
            .handle_event(free_text("\u{2600}\u{FE0F}"))
            .await
            .unwrap();

        assert_eq!(gateway.current_calls.load(Ordering::SeqCst), 0);
        let sent = delivery.take_sent();
        assert_eq!(sent.len(), 1);
        assert!(matches!(&sent[0], Sent::Sticker { reply_to: Some(id), .. } if *id == MSG));
    }

    #[tokio::test]
    async fn sentinel_is_reported_as_not_found_without_lookup() {
        let (gateway, delivery, controller) = controller();
        controller
            .continuations()
            .register(CHAT, ContinuationToken::ForecastInput)
            .await;

        controller.handle_event(free_text("...")).await.unwrap();

        assert_eq!(gateway.forecast_calls.load(Ordering::SeqCst), 0);
        assert!(controller.continuations().is_pending(CHAT).await);
        let sent = delivery.take_sent();
        assert!(matches!(&sent[0], Sent::Text { text, .. } if text.contains("<b>...</b> не найден")));
    }

    #[tokio::test]
    async fn not_found_city_is_echoed_capitalized() {
        let (gateway, delivery, controller) = controller();
        gateway.not_found.store(true, Ordering::SeqCst);

        controller.handle_event(free_text("nosuchcity")).await.unwrap();

        let sent = delivery.take_sent();
        assert!(matches!(&sent[0], Sent::Text { text, .. } if text.contains("<b>Nosuchcity</b> не найден")));
        assert!(matches!(
            &sent[1],
            Sent::Sticker { file_id, .. } if file_id == texts::STICKER_CITY_NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn location_during_forecast_continuation_gives_forecast() {
        let (gateway, _delivery, controller) = controller();
        controller
            .continuations()
            .register(CHAT, ContinuationToken::ForecastInput)
            .await;

        controller
            .handle_event(ConversationEvent::LocationShared {
                chat_id: CHAT,
                message_id: MSG,
                display_name: "Eugene".to_string(),
                latitude: 49.98,
                longitude: 36.25,
            })
            .await
            .unwrap();

        assert_eq!(gateway.forecast_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.current_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_callback_is_silent() {
        let (_gateway, delivery, controller) = controller();
        controller
            .handle_event(ConversationEvent::ButtonPressed {
                chat_id: CHAT,
                display_name: "Eugene".to_string(),
                action_id: "calendar_day_2026_8_29".to_string(),
            })
            .await
            .unwrap();
        assert!(delivery.take_sent().is_empty());
    }

    #[tokio::test]
    async fn forecast_help_button_rearms_continuation() {
        let (_gateway, delivery, controller) = controller();
        controller
            .handle_event(ConversationEvent::ButtonPressed {
                chat_id: CHAT,
                display_name: "Eugene".to_string(),
                action_id: "forecast_help".to_string(),
            })
            .await
            .unwrap();
        assert!(controller.continuations().is_pending(CHAT).await);
        assert_eq!(delivery.take_sent().len(), 2);
    }

    #[tokio::test]
    async fn unsupported_content_keeps_continuation() {
        let (_gateway, delivery, controller) = controller();
        controller
            .continuations()
            .register(CHAT, ContinuationToken::ForecastInput)
            .await;

        controller
            .handle_event(ConversationEvent::UnsupportedContent {
                chat_id: CHAT,
                message_id: MSG,
            })
            .await
            .unwrap();

        assert!(controller.continuations().is_pending(CHAT).await);
        let sent = delivery.take_sent();
        assert!(matches!(&sent[0], Sent::Sticker { reply_to: Some(id), .. } if *id == MSG));
    }
}

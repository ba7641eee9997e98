use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    KeyboardRemove, ReplyMarkup, User,
};

use crate::formatter::capitalize;

/// Кнопка отправки геолокации
pub fn location_keyboard() -> ReplyMarkup {
    ReplyMarkup::Keyboard(
        KeyboardMarkup::new(vec![vec![
            KeyboardButton::new("\u{1F310} location").request(ButtonRequest::Location)
        ]])
        .resize_keyboard()
        .one_time_keyboard(),
    )
}

pub fn remove_keyboard() -> ReplyMarkup {
    ReplyMarkup::KeyboardRemove(KeyboardRemove::new())
}

/// Подсказки после ошибки в обычном запросе погоды
pub fn current_error_keyboard() -> ReplyMarkup {
    ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("\u{1F310} location", "location"),
            InlineKeyboardButton::callback("\u{1F4C6} forecast", "forecast"),
        ],
        vec![
            InlineKeyboardButton::callback("\u{2753} help", "help"),
            InlineKeyboardButton::callback("\u{1F464} author", "author"),
        ],
    ]))
}

/// Подсказки после ошибки в запросе прогноза: help и author
/// возвращают пользователя обратно в режим прогноза
pub fn forecast_error_keyboard() -> ReplyMarkup {
    ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "\u{1F310} location",
            "location",
        )],
        vec![
            InlineKeyboardButton::callback("\u{2753} help", "forecast_help"),
            InlineKeyboardButton::callback("\u{1F464} author", "forecast_author"),
        ],
    ]))
}

/// Каждое слово с заглавной буквы
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Имя для обращения: first_name, иначе username
pub fn display_name(user: &User) -> String {
    let name = if !user.first_name.is_empty() {
        user.first_name.clone()
    } else {
        user.username.clone().unwrap_or_default()
    };
    let name = title_case(&name);
    if name.is_empty() {
        "друг".to_string()
    } else {
        name
    }
}

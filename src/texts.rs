//! Тексты ответов и наборы стикеров.

pub const DEGREE_SIGN: char = '\u{00B0}';

// Стикеры
pub const STICKER_START: &str = "CAADAgADfQIAAvnkbAABcAABA648YQ08FgQ";
pub const STICKER_HELP: &str = "CAADAgADxwIAAvnkbAABx601cOaIcf8WBA";
pub const STICKER_AUTHOR: &str = "CAADAgADtQEAAvnkbAABxHAP4NXF1FcWBA";
pub const STICKER_CITY_NOT_FOUND: &str = "CAADAgADegIAAvnkbAABGyiSVUu1QfIWBA";
pub const STICKER_CYRILLIC_ERROR: &str = "CAADAgADewIAAvnkbAABeDnKq9BHIbAWBA";

pub const ERROR_STICKERS: &[&str] = &[
    "CAADAgAD3gEAAvnkbAAB9tAurz2ipZUWBA",
    "CAADAgADpQEAAvnkbAAB3LCoSz9i3NQWBA",
    "CAADAgAD3AIAAvnkbAABZ4r6GvjutU4WBA",
    "CAADAgAD4AIAAvnkbAABano-tB5DgtYWBA",
    "CAADAgADYssAAmOLRgywPTPuHYqUWhYE",
    "CAADAgADLgADNIWFDDKv5aCIOvtVFgQ",
    "CAADAgADKAADNIWFDJH1ZYPnRgPgFgQ",
];

pub const WRONG_CONTENT_STICKERS: &[&str] = &[
    "CAADAgAD4QIAAvnkbAAB4uG83jqZC7oWBA",
    "CAADAgADdgIAAvnkbAABwOWRNMVkWAwWBA",
    "CAADAgADAQIAAvnkbAABgYkUR2jzKikWBA",
    "CAADAgAD2wEAAvnkbAABCX-hVktjtVAWBA",
    "CAADAgADwAEAAvnkbAABoDH6R5pwO0cWBA",
    "CAADAgADvwEAAvnkbAABHngR9XeKmpsWBA",
    "CAADAgADtAEAAvnkbAABLH9k4WvwzJgWBA",
    "CAADAgADOgIAAvnkbAABRlHfrrHgNBcWBA",
    "CAADAgADagEAAvnkbAABiDcDQFCEuXgWBA",
    "CAADAgADJAEAAvnkbAAB2fxXBcKZT08WBA",
    "CAADAgADNAEAAvnkbAABdiR2Dg6Dxc8WBA",
];

// Строки-инструкции для команд
pub const INSTRUCTION_LOCATION: &str = "\u{1F537} Прогноз по местоположению - /location.\n";
pub const INSTRUCTION_FORECAST: &str = "\u{1F537} Прогноз на 5 дней - /forecast.\n";
pub const INSTRUCTION_HELP: &str = "\u{1F537} Помощь - /help.\n";
pub const INSTRUCTION_AUTHOR: &str = "\u{1F537} Информации об авторе - /author.\n";

// Варианты для инлайн-кнопок (путь прогноза)
pub const INSTRUCTION_LOCATION_BUTTON: &str =
    "\u{1F537} Прогноз по местоположению - '\u{1F310} location'.\n";
pub const INSTRUCTION_HELP_BUTTON: &str = "\u{1F537} Помощь - help.\n";
pub const INSTRUCTION_AUTHOR_BUTTON: &str = "\u{1F537} Информации об авторе - author.\n";

pub const MSG_EXAMPLE_CITY: &str = "\u{1F537} Пример: <b>Kharkiv</b>.\n";

pub const AUTHOR_INFO: &str = "\u{1F537} Author: <b>Yevhen Skyba</b>\n\
    \u{1F537} Email: skiba.eugene@gmail.com\n\
    \u{1F537} LinkedIn: https://www.linkedin.com/in/yevhen-skyba/\n\
    \u{1F537} Telegram: @phobbii";

pub fn start_message(username: &str) -> String {
    format!(
        "Привет {username}.\n\
         \u{1F537} Введите город латиницей для получения погоды или\n\
         отправьте текущее местоположение - /location.\n\
         {INSTRUCTION_FORECAST}{INSTRUCTION_HELP}{INSTRUCTION_AUTHOR}"
    )
}

pub fn help_message(username: &str) -> String {
    format!(
        "{username}, введите название города латиницей.\n\
         {MSG_EXAMPLE_CITY}{INSTRUCTION_LOCATION}{INSTRUCTION_FORECAST}{INSTRUCTION_AUTHOR}"
    )
}

pub fn forecast_help_message(username: &str) -> String {
    format!(
        "{username}, введите название города латиницей.\n\
         {MSG_EXAMPLE_CITY}{INSTRUCTION_LOCATION_BUTTON}{INSTRUCTION_AUTHOR_BUTTON}"
    )
}

pub fn press_location_button(username: &str) -> String {
    format!("{username}, нажмите на кнопку '\u{1F310} location' для отправки местоположения\n")
}

pub fn enter_city_or_location(username: &str) -> String {
    format!(
        "{username}, введите город для получения прогноза на 5 дней или\n\
         нажмите '\u{1F310} location' для отправки местоположения\n"
    )
}

pub fn cyrillic_error(username: &str) -> String {
    format!(
        "{username}, пожалуйста введите название города латиницей.\n\
         {INSTRUCTION_LOCATION}{INSTRUCTION_FORECAST}{INSTRUCTION_HELP}"
    )
}

pub fn forecast_cyrillic_error(username: &str) -> String {
    format!(
        "{username}, пожалуйста введите название города латиницей.\n\
         {INSTRUCTION_LOCATION_BUTTON}{INSTRUCTION_HELP_BUTTON}"
    )
}

pub fn city_not_found(city: &str) -> String {
    format!("<b>{city}</b> не найден!\n{INSTRUCTION_LOCATION}{INSTRUCTION_FORECAST}{INSTRUCTION_HELP}")
}

pub fn forecast_city_not_found(city: &str) -> String {
    format!("<b>{city}</b> не найден!\n{INSTRUCTION_LOCATION_BUTTON}{INSTRUCTION_HELP_BUTTON}")
}

pub fn service_unavailable(username: &str) -> String {
    format!(
        "{username}, прошу прощения, в данный момент сервис погоды не доступен!\n\
         Попробуйте позже\n"
    )
}

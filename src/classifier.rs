//! Классификация пользовательского ввода перед запросом погоды.
//!
//! Чистые функции без зависимостей. Порядок проверок фиксированный:
//! сначала эмодзи, затем кириллица, затем заглушка `...`.

/// Зарезервированная заглушка "ничего не введено".
pub const SENTINEL_PLACEHOLDER: &str = "...";

// Кириллический блок
const CYRILLIC: std::ops::RangeInclusive<u32> = 0x0400..=0x04FF;

// Основные блоки эмодзи
const EMOJI_BLOCKS: &[std::ops::RangeInclusive<u32>] = &[
    0x1F300..=0x1F5FF, // symbols & pictographs
    0x1F600..=0x1F64F, // emoticons
    0x1F680..=0x1F6FF, // transport
    0x1F900..=0x1F9FF, // supplemental symbols
    0x1FA70..=0x1FAFF, // extended-A
    0x2600..=0x26FF,   // miscellaneous symbols
    0x2700..=0x27BF,   // dingbats
    0x1F1E6..=0x1F1FF, // regional indicators
    0x2B00..=0x2BFF,   // arrows & stars
];

// Модификаторы, которые сами по себе не считаются эмодзи,
// но не мешают строке быть "только эмодзи"
const EMOJI_JOINERS: &[u32] = &[0x200D, 0xFE0E, 0xFE0F, 0x20E3];

/// Результат классификации свободного текста.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputClass {
    /// Только эмодзи: не имя города и не "не найден", запрос к API не делается.
    EmojiOnly,
    /// Есть символы вне латиницы (кириллица), провайдер такое не разрешит.
    NonLatinScript,
    /// Ровно `...`.
    Sentinel,
    /// Можно пробовать искать.
    Lookup,
}

pub fn is_non_latin_script(text: &str) -> bool {
    text.chars().any(|c| CYRILLIC.contains(&(c as u32)))
}

/// Только точное совпадение, вхождение подстрокой не считается.
pub fn is_sentinel_placeholder(text: &str) -> bool {
    text == SENTINEL_PLACEHOLDER
}

fn is_emoji_char(c: char) -> bool {
    let code = c as u32;
    EMOJI_BLOCKS.iter().any(|range| range.contains(&code))
}

fn is_emoji_modifier(c: char) -> bool {
    let code = c as u32;
    EMOJI_JOINERS.contains(&code) || (0x1F3FB..=0x1F3FF).contains(&code)
}

/// Текст состоит из эмодзи и не содержит пригодного имени места.
pub fn is_emoji_only(text: &str) -> bool {
    let mut has_emoji = false;
    for c in text.chars() {
        if c.is_whitespace() || is_emoji_modifier(c) {
            continue;
        }
        if is_emoji_char(c) {
            has_emoji = true;
        } else {
            return false;
        }
    }
    has_emoji
}

/// Классификация в фиксированном порядке: эмодзи → кириллица → заглушка.
pub fn classify(text: &str) -> InputClass {
    if is_emoji_only(text) {
        InputClass::EmojiOnly
    } else if is_non_latin_script(text) {
        InputClass::NonLatinScript
    } else if is_sentinel_placeholder(text) {
        InputClass::Sentinel
    } else {
        InputClass::Lookup
    }
}

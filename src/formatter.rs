//! Форматирование погодных данных в HTML-сообщения.
//!
//! Детерминированные функции: всё «сейчас» уже зафиксировано в данных,
//! часов здесь нет.

use chrono::{Locale, NaiveDate};

use crate::texts::DEGREE_SIGN;
use crate::weather::{ForecastResult, WeatherResult};

const HPA_TO_MMHG: f64 = 0.75;

/// Перевод гектопаскалей в миллиметры ртутного столба, с округлением.
pub fn hpa_to_mmhg(hpa: f64) -> i32 {
    (hpa * HPA_TO_MMHG).round() as i32
}

/// Эмодзи по коду иконки провайдера. День/ночь различаются только для
/// ясного неба, у остальных кодов суффикс отбрасывается.
pub fn icon_emoji(icon_code: &str) -> &'static str {
    match icon_code {
        "01d" => "\u{2600}",
        "01n" => "\u{1F311}",
        _ => match icon_code.get(..2) {
            Some("02") => "\u{26C5}",
            Some("03") | Some("04") => "\u{2601}",
            Some("09") | Some("10") => "\u{2614}",
            Some("11") => "\u{26A1}",
            Some("13") => "\u{2744}",
            Some("50") => "\u{1F32B}",
            _ => "",
        },
    }
}

/// Флаг страны из двухбуквенного кода через региональные индикаторы.
pub fn country_flag(country_code: &str) -> String {
    country_code
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| {
            let offset = c.to_ascii_uppercase() as u32 - 'A' as u32;
            char::from_u32(0x1F1E6 + offset).unwrap_or(c)
        })
        .collect()
}

/// Первая буква заглавная, остальные строчные.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn locale_for(tag: &str) -> Locale {
    match tag.to_lowercase().as_str() {
        "ru" => Locale::ru_RU,
        "uk" | "ua" => Locale::uk_UA,
        _ => Locale::en_US,
    }
}

/// Локализованная дата вида «Суббота, 29 августа 2026».
pub fn localized_date(date: NaiveDate, locale: &str) -> String {
    let formatted = date
        .format_localized("%A, %-d %B %Y", locale_for(locale))
        .to_string();
    capitalize(&formatted)
}

fn location_header(
    display_name: &str,
    location_name: &str,
    region: Option<&str>,
    country: Option<&str>,
    timezone_name: &str,
) -> String {
    let mut header = format!("{display_name}, в <b>{location_name}</b>\n\n");
    if let Some(region) = region {
        header.push_str(&format!("\u{1F5FA} <i>Регион:</i> <b>{region}</b>\n"));
    }
    if let Some(country) = country {
        let flag = country_flag(country);
        header.push_str(&format!("{flag} <i>Код страны:</i> <b>{country}</b>\n"));
    }
    header.push_str(&format!(
        "\u{1F30D} <i>Часовой пояс:</i> <b>{timezone_name}</b>\n"
    ));
    header
}

/// Текущая погода одной записью.
pub fn format_current(display_name: &str, weather: &WeatherResult, locale: &str) -> String {
    let mut answer = location_header(
        display_name,
        &weather.location_name,
        weather.region.as_deref(),
        weather.country.as_deref(),
        &weather.timezone_name,
    );
    let date = localized_date(weather.observed_at_local.date(), locale);
    let time = weather.observed_at_local.format("%H:%M:%S");
    answer.push_str(&format!("\u{1F4C5} <i>Дата:</i> <b>{date}</b>\n"));
    answer.push_str(&format!("\u{23F0} <i>Текущее время:</i> <b>{time}</b>\n"));
    answer.push_str(&format!(
        "{} <i>Статус:</i> <b>{}</b>\n",
        icon_emoji(&weather.icon_code),
        capitalize(&weather.status_text)
    ));
    answer.push_str(&format!(
        "\u{1F321} <i>Температура воздуха:</i> <b>{} {DEGREE_SIGN}C</b>\n",
        weather.temp_c
    ));
    answer.push_str(&format!(
        "\u{1F4CA} <i>Давление:</i> <b>{} мм</b>\n",
        weather.pressure_mmhg
    ));
    answer.push_str(&format!(
        "\u{1F4A7} <i>Влажность:</i> <b>{} %</b>\n",
        weather.humidity_pct
    ));
    answer.push_str(&format!(
        "\u{1F4A8} <i>Скорость ветра:</i> <b>{} м/c</b>\n\n",
        weather.wind_speed
    ));
    answer
}

/// Прогноз: блок на каждый агрегированный день.
pub fn format_forecast(display_name: &str, forecast: &ForecastResult, locale: &str) -> String {
    let mut answer = location_header(
        display_name,
        &forecast.location_name,
        forecast.region.as_deref(),
        forecast.country.as_deref(),
        &forecast.timezone_name,
    );
    answer.push('\n');
    for day in &forecast.days {
        // min == max уже на округлённых целых, диапазон вырождается
        let (temp_label, temp_str) = if day.temp_min == day.temp_max {
            ("Средняя температура воздуха", day.temp_min.to_string())
        } else {
            ("Температура воздуха", format!("{}...{}", day.temp_min, day.temp_max))
        };
        answer.push_str(&format!(
            "\u{1F4C5} <i>Дата:</i> <b>{}</b>\n",
            localized_date(day.date_local, locale)
        ));
        answer.push_str(&format!(
            "{} <i>Статус:</i> <b>{}</b>\n",
            icon_emoji(&day.dominant_icon),
            capitalize(&day.dominant_status)
        ));
        answer.push_str(&format!(
            "\u{1F321} <i>{temp_label}:</i> <b>{temp_str} {DEGREE_SIGN}C</b>\n"
        ));
        answer.push_str(&format!(
            "\u{1F4CA} <i>Давление:</i> <b>{} мм</b>\n",
            day.pressure_avg
        ));
        answer.push_str(&format!(
            "\u{1F4A7} <i>Влажность:</i> <b>{} %</b>\n",
            day.humidity_avg
        ));
        answer.push_str(&format!(
            "\u{1F4A8} <i>Скорость ветра:</i> <b>{} м/c</b>\n\n",
            day.wind_speed_avg
        ));
    }
    answer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::DaySummary;
    use chrono::NaiveDate;

    fn current_fixture() -> WeatherResult {
        WeatherResult {
            location_name: "Kharkiv".to_string(),
            country: Some("UA".to_string()),
            region: Some("Kharkiv Oblast".to_string()),
            timezone_name: "Europe/Kyiv".to_string(),
            icon_code: "01d".to_string(),
            status_text: "clear sky".to_string(),
            temp_c: 21,
            pressure_mmhg: 748,
            humidity_pct: 40,
            wind_speed: 3,
            observed_at_local: NaiveDate::from_ymd_opt(2026, 8, 29)
                .unwrap()
                .and_hms_opt(14, 30, 5)
                .unwrap(),
        }
    }

    fn day(min: i32, max: i32) -> DaySummary {
        DaySummary {
            date_local: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            temp_min: min,
            temp_max: max,
            pressure_avg: 750,
            humidity_avg: 55,
            wind_speed_avg: 4,
            dominant_status: "light rain".to_string(),
            dominant_icon: "10".to_string(),
        }
    }

    #[test]
    fn pressure_conversion_rounds() {
        assert_eq!(hpa_to_mmhg(1000.0), 750);
        assert_eq!(hpa_to_mmhg(998.0), 749); // 748.5 → 749
        assert_eq!(hpa_to_mmhg(0.0), 0);
    }

    #[test]
    fn icon_mapping() {
        assert_eq!(icon_emoji("01d"), "\u{2600}");
        assert_eq!(icon_emoji("01n"), "\u{1F311}");
        assert_eq!(icon_emoji("04n"), "\u{2601}");
        assert_eq!(icon_emoji("10d"), "\u{2614}");
        assert_eq!(icon_emoji("99x"), "");
    }

    #[test]
    fn flag_from_country_code() {
        assert_eq!(country_flag("UA"), "\u{1F1FA}\u{1F1E6}");
        assert_eq!(country_flag("gb"), "\u{1F1EC}\u{1F1E7}");
        assert_eq!(country_flag(""), "");
    }

    #[test]
    fn capitalize_lowercases_tail() {
        assert_eq!(capitalize("light RAIN"), "Light rain");
        assert_eq!(capitalize("харків"), "Харків");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn formatting_is_deterministic() {
        let weather = current_fixture();
        let first = format_current("Eugene", &weather, "ru");
        let second = format_current("Eugene", &weather, "ru");
        assert_eq!(first, second);
    }

    #[test]
    fn current_includes_all_lines() {
        let rendered = format_current("Eugene", &current_fixture(), "ru");
        assert!(rendered.starts_with("Eugene, в <b>Kharkiv</b>"));
        assert!(rendered.contains("<i>Регион:</i> <b>Kharkiv Oblast</b>"));
        assert!(rendered.contains("\u{1F1FA}\u{1F1E6} <i>Код страны:</i> <b>UA</b>"));
        assert!(rendered.contains("<i>Часовой пояс:</i> <b>Europe/Kyiv</b>"));
        assert!(rendered.contains("<b>14:30:05</b>"));
        assert!(rendered.contains("<b>21 \u{00B0}C</b>"));
        assert!(rendered.contains("<b>748 мм</b>"));
    }

    #[test]
    fn optional_header_lines_are_omitted() {
        let mut weather = current_fixture();
        weather.country = None;
        weather.region = None;
        let rendered = format_current("Eugene", &weather, "ru");
        assert!(!rendered.contains("Код страны"));
        assert!(!rendered.contains("Регион"));
    }

    #[test]
    fn forecast_temperature_branches() {
        let forecast = ForecastResult {
            location_name: "Kharkiv".to_string(),
            country: None,
            region: None,
            timezone_name: "Europe/Kyiv".to_string(),
            days: vec![day(10, 10), day(8, 15)],
        };
        let rendered = format_forecast("Eugene", &forecast, "ru");
        assert!(rendered.contains("<i>Средняя температура воздуха:</i> <b>10 \u{00B0}C</b>"));
        assert!(rendered.contains("<i>Температура воздуха:</i> <b>8...15 \u{00B0}C</b>"));
    }

    #[test]
    fn date_is_localized_and_capitalized() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let ru = localized_date(date, "ru");
        assert!(ru.starts_with("Суббота"));
        assert!(ru.contains("2026"));
        let en = localized_date(date, "en");
        assert!(en.starts_with("Saturday"));
    }
}

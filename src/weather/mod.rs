pub mod owm;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::formatter;

/// Запрос к провайдеру погоды: либо имя места, либо координаты.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    place: Option<String>,
    coords: Option<(f64, f64)>,
}

impl WeatherQuery {
    /// Ровно один из аргументов должен быть задан.
    pub fn new(place: Option<String>, coords: Option<(f64, f64)>) -> Result<Self, GatewayError> {
        match (&place, &coords) {
            (Some(p), None) if !p.trim().is_empty() => Ok(Self { place, coords }),
            (Some(_), None) => Err(GatewayError::InvalidQuery("place name is empty")),
            (None, Some(_)) => Ok(Self { place, coords }),
            (Some(_), Some(_)) => Err(GatewayError::InvalidQuery(
                "both place and coordinates given",
            )),
            (None, None) => Err(GatewayError::InvalidQuery(
                "neither place nor coordinates given",
            )),
        }
    }

    pub fn by_place(place: impl Into<String>) -> Result<Self, GatewayError> {
        Self::new(Some(place.into()), None)
    }

    pub fn by_coords(lat: f64, lon: f64) -> Result<Self, GatewayError> {
        Self::new(None, Some((lat, lon)))
    }

    pub fn place(&self) -> Option<&str> {
        self.place.as_deref()
    }

    pub fn coords(&self) -> Option<(f64, f64)> {
        self.coords
    }
}

/// Текущая погода, готовая к отображению.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherResult {
    pub location_name: String,
    pub country: Option<String>,
    pub region: Option<String>,
    pub timezone_name: String,
    pub icon_code: String,
    pub status_text: String,
    pub temp_c: i32,
    pub pressure_mmhg: i32,
    pub humidity_pct: u32,
    pub wind_speed: i32,
    pub observed_at_local: NaiveDateTime,
}

/// Сводка за один локальный календарный день.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub date_local: NaiveDate,
    pub temp_min: i32,
    pub temp_max: i32,
    pub pressure_avg: i32,
    pub humidity_avg: u32,
    pub wind_speed_avg: i32,
    pub dominant_status: String,
    pub dominant_icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub location_name: String,
    pub country: Option<String>,
    pub region: Option<String>,
    pub timezone_name: String,
    pub days: Vec<DaySummary>,
}

/// Сырое трёхчасовое измерение из прогноза провайдера.
#[derive(Debug, Clone)]
pub struct ForecastSample {
    pub timestamp_utc: DateTime<Utc>,
    pub temp_c: f64,
    pub pressure_hpa: f64,
    pub humidity_pct: u32,
    pub wind_speed: f64,
    pub status: String,
    pub icon_code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("location not found")]
    NotFound,
    #[error("invalid weather query: {0}")]
    InvalidQuery(&'static str),
    #[error("weather provider error: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Upstream(err.to_string())
    }
}

impl From<reqwest_middleware::Error> for GatewayError {
    fn from(err: reqwest_middleware::Error) -> Self {
        GatewayError::Upstream(err.to_string())
    }
}

/// Контракт провайдера погоды.
#[async_trait]
pub trait WeatherGateway: Send + Sync {
    async fn lookup_current(&self, query: &WeatherQuery) -> Result<WeatherResult, GatewayError>;
    async fn lookup_forecast(&self, query: &WeatherQuery) -> Result<ForecastResult, GatewayError>;
    async fn is_live(&self) -> bool;
}

/// Группирует трёхчасовые измерения по локальным календарным дням и
/// сворачивает каждый день в одну сводку: min/max температуры, средние
/// давление/влажность/ветер, самый частый статус и иконка.
pub fn aggregate_days(samples: &[ForecastSample], tz: Tz, limit: Option<usize>) -> Vec<DaySummary> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
    for sample in samples {
        let local_date = sample.timestamp_utc.with_timezone(&tz).date_naive();
        by_day.entry(local_date).or_default().push(sample);
    }

    let mut days: Vec<DaySummary> = by_day
        .into_iter()
        .map(|(date_local, entries)| {
            let n = entries.len() as f64;
            let temp_min = entries.iter().map(|e| e.temp_c).fold(f64::INFINITY, f64::min);
            let temp_max = entries
                .iter()
                .map(|e| e.temp_c)
                .fold(f64::NEG_INFINITY, f64::max);
            let pressure_avg = entries.iter().map(|e| e.pressure_hpa).sum::<f64>() / n;
            let humidity_avg = entries.iter().map(|e| e.humidity_pct as f64).sum::<f64>() / n;
            let wind_avg = entries.iter().map(|e| e.wind_speed).sum::<f64>() / n;

            DaySummary {
                date_local,
                temp_min: temp_min.round() as i32,
                temp_max: temp_max.round() as i32,
                pressure_avg: formatter::hpa_to_mmhg(pressure_avg),
                humidity_avg: humidity_avg.round() as u32,
                wind_speed_avg: wind_avg.round() as i32,
                dominant_status: dominant(entries.iter().map(|e| e.status.as_str())),
                dominant_icon: dominant(entries.iter().map(|e| e.icon_code.as_str())),
            }
        })
        .collect();

    if let Some(limit) = limit {
        days.truncate(limit);
    }
    days
}

// Самое частое значение; при равенстве побеждает встреченное раньше.
fn dominant<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some(entry) => entry.1 += 1,
            None => counts.push((value, 1)),
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(v, _)| v.to_string()).unwrap_or_default()
}

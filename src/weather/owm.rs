//! Шлюз к OpenWeatherMap: текущая погода, прогноз 5 дней / 3 часа,
//! обратное геокодирование и определение часового пояса по координатам.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tzf_rs::DefaultFinder;

use crate::formatter;
use crate::weather::{
    aggregate_days, ForecastResult, ForecastSample, GatewayError, WeatherGateway, WeatherQuery,
    WeatherResult,
};

const API_BASE_URL: &str = "https://api.openweathermap.org";
const RETRIES: u32 = 1;
// Пробный город для проверки доступности API
const LIVENESS_PROBE_PLACE: &str = "London,GB";

#[derive(Debug, Deserialize)]
struct Coord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherDesc {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct MainData {
    temp: f64,
    pressure: f64,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    coord: Coord,
    weather: Vec<WeatherDesc>,
    main: MainData,
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: MainData,
    weather: Vec<WeatherDesc>,
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct ForecastCity {
    name: String,
    coord: Coord,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
    city: ForecastCity,
}

#[derive(Debug, Deserialize)]
struct GeoEntry {
    country: Option<String>,
    state: Option<String>,
}

/// Клиент OpenWeatherMap поверх reqwest с повтором transient-ошибок.
pub struct OwmGateway {
    http: ClientWithMiddleware,
    api_key: String,
    lang: String,
    base_url: String,
    tz_finder: DefaultFinder,
    forecast_days: Option<usize>,
}

impl OwmGateway {
    pub fn new(api_key: String, lang: String, forecast_days: Option<usize>) -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(RETRIES);
        let http = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        Self {
            http,
            api_key,
            lang,
            base_url: API_BASE_URL.to_string(),
            tz_finder: DefaultFinder::new(),
            forecast_days,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn lookup_params(&self, query: &WeatherQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
            ("lang", self.lang.clone()),
        ];
        if let Some((lat, lon)) = query.coords() {
            params.push(("lat", lat.to_string()));
            params.push(("lon", lon.to_string()));
        } else if let Some(place) = query.place() {
            params.push(("q", place.to_string()));
        }
        params
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, GatewayError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(params)
            .send()
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Err(GatewayError::NotFound),
            status if status.is_success() => Ok(response.json::<T>().await?),
            status => Err(GatewayError::Upstream(format!(
                "unexpected status {status}"
            ))),
        }
    }

    /// Имя зоны IANA по координатам; если не нашлось — UTC.
    fn resolve_timezone(&self, lat: f64, lon: f64) -> (Tz, String) {
        let name = self.tz_finder.get_tz_name(lon, lat);
        match Tz::from_str(name) {
            Ok(tz) if !name.is_empty() => (tz, name.to_string()),
            _ => (Tz::UTC, "UTC".to_string()),
        }
    }

    /// Код страны и регион через обратное геокодирование.
    /// Ошибки не фатальны: строки просто не попадут в ответ.
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> (Option<String>, Option<String>) {
        let params = vec![
            ("appid", self.api_key.clone()),
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("limit", "1".to_string()),
        ];
        match self.get_json::<Vec<GeoEntry>>("/geo/1.0/reverse", &params).await {
            Ok(entries) => match entries.into_iter().next() {
                Some(entry) => (
                    entry.country.filter(|c| !c.is_empty()),
                    entry.state.filter(|s| !s.is_empty()),
                ),
                None => (None, None),
            },
            Err(e) => {
                log::error!("Error fetching geo info: {e}");
                (None, None)
            }
        }
    }
}

#[async_trait]
impl WeatherGateway for OwmGateway {
    async fn lookup_current(&self, query: &WeatherQuery) -> Result<WeatherResult, GatewayError> {
        let raw: CurrentResponse = self
            .get_json("/data/2.5/weather", &self.lookup_params(query))
            .await?;
        let (tz, timezone_name) = self.resolve_timezone(raw.coord.lat, raw.coord.lon);
        let (country, region) = self.reverse_geocode(raw.coord.lat, raw.coord.lon).await;
        let desc = raw.weather.into_iter().next().unwrap_or(WeatherDesc {
            description: String::new(),
            icon: String::new(),
        });
        // Локальное время фиксируется здесь, форматтер часы не читает
        let observed_at_local = Utc::now().with_timezone(&tz).naive_local();

        Ok(WeatherResult {
            location_name: raw.name,
            country,
            region,
            timezone_name,
            icon_code: desc.icon,
            status_text: desc.description,
            temp_c: raw.main.temp.round() as i32,
            pressure_mmhg: formatter::hpa_to_mmhg(raw.main.pressure),
            humidity_pct: raw.main.humidity,
            wind_speed: raw.wind.speed.round() as i32,
            observed_at_local,
        })
    }

    async fn lookup_forecast(&self, query: &WeatherQuery) -> Result<ForecastResult, GatewayError> {
        let raw: ForecastResponse = self
            .get_json("/data/2.5/forecast", &self.lookup_params(query))
            .await?;
        let (tz, timezone_name) = self.resolve_timezone(raw.city.coord.lat, raw.city.coord.lon);
        let (country, region) = self
            .reverse_geocode(raw.city.coord.lat, raw.city.coord.lon)
            .await;

        let samples: Vec<ForecastSample> = raw
            .list
            .into_iter()
            .filter_map(|entry| {
                let timestamp_utc = DateTime::<Utc>::from_timestamp(entry.dt, 0)?;
                let desc = entry.weather.into_iter().next()?;
                Some(ForecastSample {
                    timestamp_utc,
                    temp_c: entry.main.temp,
                    pressure_hpa: entry.main.pressure,
                    humidity_pct: entry.main.humidity,
                    wind_speed: entry.wind.speed,
                    status: desc.description,
                    icon_code: desc.icon,
                })
            })
            .collect();

        let days = aggregate_days(&samples, tz, self.forecast_days);
        if days.is_empty() {
            return Err(GatewayError::NotFound);
        }

        Ok(ForecastResult {
            location_name: raw.city.name,
            country,
            region,
            timezone_name,
            days,
        })
    }

    async fn is_live(&self) -> bool {
        let params = vec![
            ("appid", self.api_key.clone()),
            ("q", LIVENESS_PROBE_PLACE.to_string()),
        ];
        let response = self
            .http
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&params)
            .send()
            .await;
        match response {
            Ok(r) => r.status().is_success(),
            Err(e) => {
                log::error!("Weather API liveness probe failed: {e}");
                false
            }
        }
    }
}

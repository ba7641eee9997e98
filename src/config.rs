//! Конфигурация из переменных окружения.

use std::time::Duration;

use url::Url;

const DEFAULT_LOCALE: &str = "ru";
const DEFAULT_RETRY_DELAY_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: Url,
    pub port: u16,
    pub secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub owm_key: String,
    pub locale: String,
    pub send_retry_delay: Duration,
    pub forecast_days: Option<usize>,
    /// Имя бота без @, нужно для фильтрации сообщений в группах.
    pub bot_username: Option<String>,
    /// Без вебхука бот работает через long polling.
    pub webhook: Option<WebhookConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {details}")]
    Invalid { var: &'static str, details: String },
    #[error("WEBHOOK_URL and WEBHOOK_PORT must be set together")]
    PartialWebhook,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Токен читает сам teloxide, но падать лучше на старте
        if lookup("TELOXIDE_TOKEN").is_none() {
            return Err(ConfigError::Missing("TELOXIDE_TOKEN"));
        }
        let owm_key = lookup("OWM_KEY").ok_or(ConfigError::Missing("OWM_KEY"))?;

        let locale = lookup("BOT_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let send_retry_delay = match lookup("SEND_RETRY_DELAY_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                    var: "SEND_RETRY_DELAY_SECS",
                    details: format!("expected an integer, got {raw:?}"),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        };

        let forecast_days = match lookup("FORECAST_DAYS") {
            Some(raw) => Some(raw.parse::<usize>().map_err(|_| ConfigError::Invalid {
                var: "FORECAST_DAYS",
                details: format!("expected an integer, got {raw:?}"),
            })?),
            None => None,
        };

        let bot_username = lookup("BOT_USERNAME").map(|u| u.trim_start_matches('@').to_string());

        let webhook = match (lookup("WEBHOOK_URL"), lookup("WEBHOOK_PORT")) {
            (Some(raw_url), Some(raw_port)) => {
                let url = raw_url.parse::<Url>().map_err(|e| ConfigError::Invalid {
                    var: "WEBHOOK_URL",
                    details: e.to_string(),
                })?;
                let port = raw_port.parse::<u16>().map_err(|_| ConfigError::Invalid {
                    var: "WEBHOOK_PORT",
                    details: format!("expected a port number, got {raw_port:?}"),
                })?;
                Some(WebhookConfig {
                    url,
                    port,
                    secret: lookup("WEBHOOK_SECRET"),
                })
            }
            (None, None) => None,
            _ => return Err(ConfigError::PartialWebhook),
        };

        Ok(Self {
            owm_key,
            locale,
            send_retry_delay,
            forecast_days,
            bot_username,
            webhook,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn build(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map = vars(pairs);
        AppConfig::from_vars(|name| map.get(name).cloned())
    }

    const MINIMAL: &[(&str, &str)] = &[("TELOXIDE_TOKEN", "123:abc"), ("OWM_KEY", "key")];

    #[test]
    fn minimal_config_uses_defaults() {
        let config = build(MINIMAL).unwrap();
        assert_eq!(config.locale, "ru");
        assert_eq!(config.send_retry_delay, Duration::from_secs(5));
        assert_eq!(config.forecast_days, None);
        assert!(config.webhook.is_none());
    }

    #[test]
    fn missing_required_vars_fail() {
        assert!(matches!(
            build(&[("OWM_KEY", "key")]),
            Err(ConfigError::Missing("TELOXIDE_TOKEN"))
        ));
        assert!(matches!(
            build(&[("TELOXIDE_TOKEN", "123:abc")]),
            Err(ConfigError::Missing("OWM_KEY"))
        ));
    }

    #[test]
    fn partial_webhook_group_is_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("WEBHOOK_URL", "https://bot.example.com/webhook"));
        assert!(matches!(build(&pairs), Err(ConfigError::PartialWebhook)));
    }

    #[test]
    fn full_webhook_group_parses() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("WEBHOOK_URL", "https://bot.example.com/webhook"));
        pairs.push(("WEBHOOK_PORT", "8443"));
        pairs.push(("WEBHOOK_SECRET", "s3cret"));
        let config = build(&pairs).unwrap();
        let webhook = config.webhook.unwrap();
        assert_eq!(webhook.port, 8443);
        assert_eq!(webhook.secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn invalid_numbers_are_reported() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("FORECAST_DAYS", "many"));
        assert!(matches!(
            build(&pairs),
            Err(ConfigError::Invalid { var: "FORECAST_DAYS", .. })
        ));
    }

    #[test]
    fn bot_username_is_normalized() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("BOT_USERNAME", "@weather_bot"));
        assert_eq!(build(&pairs).unwrap().bot_username.as_deref(), Some("weather_bot"));
    }
}

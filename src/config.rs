//! Environment-driven configuration

use crate::engine::pyramiding::{DEFAULT_MAX_ENTRIES, MAX_ENTRIES_LIMIT};
use crate::engine::window::DEFAULT_WINDOW_SIZE;
use crate::error::ConfigError;
use crate::indicators::snapshot::MIN_INDICATOR_PERIOD;
use crate::services::dispatch::dispatcher::DEFAULT_QUEUE_CAPACITY;
use crate::services::feed::FeedConfig;
use crate::signals::evaluator::DEFAULT_ADX_THRESHOLD;
use crate::signals::session::SessionWindow;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Deployment environment, used to pick the log format.
    pub environment: String,
    pub feed: FeedConfig,
    pub timeframe: String,
    pub window_size: usize,
    pub session: SessionWindow,
    pub adx_threshold: f64,
    pub max_entries: u8,
    pub alert_queue_capacity: usize,
    pub alert_webhook_url: Option<String>,
    /// Port for `/health` and `/metrics`; `None` disables the server.
    pub http_port: Option<u16>,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Missing keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = FeedConfig::default();

        let symbols = match get("SYMBOLS") {
            Some(raw) => parse_symbols(&raw)?,
            None => defaults.symbols.clone(),
        };

        let window_size: usize = parse_or("WINDOW_SIZE", get("WINDOW_SIZE"), DEFAULT_WINDOW_SIZE)?;
        if window_size < MIN_INDICATOR_PERIOD {
            return Err(ConfigError::Constraint(format!(
                "WINDOW_SIZE must be at least {}, got {}",
                MIN_INDICATOR_PERIOD, window_size
            )));
        }

        let session = SessionWindow::new(
            parse_or("SESSION_START_HOUR", get("SESSION_START_HOUR"), 5)?,
            parse_or("SESSION_END_HOUR", get("SESSION_END_HOUR"), 22)?,
        )?;

        let adx_threshold: f64 = parse_or("ADX_THRESHOLD", get("ADX_THRESHOLD"), DEFAULT_ADX_THRESHOLD)?;
        if !adx_threshold.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "ADX_THRESHOLD",
                value: adx_threshold.to_string(),
            });
        }

        let heartbeat_interval = Duration::from_secs(parse_or("HEARTBEAT_INTERVAL_SECS", get("HEARTBEAT_INTERVAL_SECS"), 20)?);
        let heartbeat_timeout = Duration::from_secs(parse_or("HEARTBEAT_TIMEOUT_SECS", get("HEARTBEAT_TIMEOUT_SECS"), 10)?);
        let reconnect_min_delay = Duration::from_millis(parse_or("RECONNECT_MIN_DELAY_MS", get("RECONNECT_MIN_DELAY_MS"), 1000)?);
        let reconnect_max_delay = Duration::from_millis(parse_or("RECONNECT_MAX_DELAY_MS", get("RECONNECT_MAX_DELAY_MS"), 30_000)?);
        if heartbeat_interval.is_zero() || heartbeat_timeout.is_zero() {
            return Err(ConfigError::Constraint("heartbeat interval and timeout must be non-zero".to_string()));
        }
        if reconnect_min_delay.is_zero() || reconnect_min_delay > reconnect_max_delay {
            return Err(ConfigError::Constraint(
                "reconnect delays must satisfy 0 < min <= max".to_string(),
            ));
        }

        let max_entries: u8 = parse_or("MAX_ENTRIES", get("MAX_ENTRIES"), DEFAULT_MAX_ENTRIES)?;
        if !(1..=MAX_ENTRIES_LIMIT).contains(&max_entries) {
            return Err(ConfigError::Constraint(format!(
                "MAX_ENTRIES must be between 1 and {}, got {}",
                MAX_ENTRIES_LIMIT, max_entries
            )));
        }

        let http_port: u16 = parse_or("PORT", get("PORT"), 8080)?;

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or_else(|| "sandbox".to_string()),
            feed: FeedConfig {
                url: match get("FEED_URL") {
                    Some(raw) => parse_url("FEED_URL", raw, &["ws", "wss"])?,
                    None => defaults.url,
                },
                symbols,
                interval: get("CANDLE_INTERVAL").unwrap_or(defaults.interval),
                heartbeat_interval,
                heartbeat_timeout,
                reconnect_min_delay,
                reconnect_max_delay,
                confirmed_only: parse_bool("CONFIRMED_CANDLES_ONLY", get("CONFIRMED_CANDLES_ONLY"), defaults.confirmed_only)?,
            },
            timeframe: get("TIMEFRAME_LABEL").unwrap_or_else(|| "3m".to_string()),
            window_size,
            session,
            adx_threshold,
            max_entries,
            alert_queue_capacity: parse_or("ALERT_QUEUE_CAPACITY", get("ALERT_QUEUE_CAPACITY"), DEFAULT_QUEUE_CAPACITY)?.max(1),
            alert_webhook_url: get("ALERT_WEBHOOK_URL")
                .map(|raw| parse_url("ALERT_WEBHOOK_URL", raw, &["http", "https"]))
                .transpose()?,
            http_port: (http_port != 0).then_some(http_port),
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            feed: FeedConfig::default(),
            timeframe: "3m".to_string(),
            window_size: DEFAULT_WINDOW_SIZE,
            session: SessionWindow::default(),
            adx_threshold: DEFAULT_ADX_THRESHOLD,
            max_entries: DEFAULT_MAX_ENTRIES,
            alert_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            alert_webhook_url: None,
            http_port: Some(8080),
        }
    }
}

fn parse_symbols(raw: &str) -> Result<Vec<String>, ConfigError> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(|s| s.trim().to_uppercase()).filter(|s| !s.is_empty()) {
        if symbol.contains('.') {
            return Err(ConfigError::InvalidValue {
                key: "SYMBOLS",
                value: raw.to_string(),
            });
        }
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    if symbols.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "SYMBOLS",
            value: raw.to_string(),
        });
    }
    Ok(symbols)
}

fn parse_url(key: &'static str, raw: String, schemes: &[&str]) -> Result<String, ConfigError> {
    match Url::parse(&raw) {
        Ok(url) if schemes.contains(&url.scheme()) => Ok(raw),
        _ => Err(ConfigError::InvalidValue { key, value: raw }),
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(default),
    }
}

fn parse_bool(key: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value: raw }),
    }
}

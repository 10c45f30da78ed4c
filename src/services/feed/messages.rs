//! Wire messages for the public kline stream

use crate::error::DecodeError;
use crate::models::Candle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CANDLE_TOPIC_PREFIX: &str = "kline";

/// Application-level heartbeat understood by the venue.
pub const PING_FRAME: &str = r#"{"op":"ping"}"#;

/// `{"op":"subscribe","args":["kline.3.BTCUSDT", ...]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscribeRequest {
    pub op: &'static str,
    pub args: Vec<String>,
}

impl SubscribeRequest {
    pub fn candles<S: AsRef<str>>(interval: &str, symbols: &[S]) -> Self {
        Self {
            op: "subscribe",
            args: symbols
                .iter()
                .map(|s| candle_topic(interval, s.as_ref()))
                .collect(),
        }
    }
}

pub fn candle_topic(interval: &str, symbol: &str) -> String {
    format!("{}.{}.{}", CANDLE_TOPIC_PREFIX, interval, symbol)
}

/// Symbol named by a `kline.{interval}.{symbol}` topic.
pub fn topic_symbol(topic: &str) -> Result<&str, DecodeError> {
    let mut parts = topic.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(CANDLE_TOPIC_PREFIX), Some(interval), Some(symbol), None)
            if !interval.is_empty() && !symbol.is_empty() =>
        {
            Ok(symbol)
        }
        _ => Err(DecodeError::UnknownTopic(topic.to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    topic: Option<String>,
    data: Option<Value>,
    op: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCandle {
    symbol: Option<String>,
    close: Option<Value>,
    high: Option<Value>,
    low: Option<Value>,
    end: Option<Value>,
    timestamp: Option<Value>,
    #[serde(default)]
    confirm: bool,
}

/// A candle decoded from the stream plus the venue's "bar closed" flag.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCandle {
    pub candle: Candle,
    pub confirmed: bool,
}

/// Candles from one data frame. Bad records are reported individually so the
/// good ones in the same frame still go through.
#[derive(Debug, Default)]
pub struct CandleBatch {
    pub candles: Vec<DecodedCandle>,
    pub rejected: Vec<DecodeError>,
}

#[derive(Debug)]
pub enum FeedMessage {
    Candles(CandleBatch),
    /// Subscription acks, pongs and other `op` replies.
    Control(String),
}

pub fn decode_frame(text: &str) -> Result<FeedMessage, DecodeError> {
    let frame: RawFrame = serde_json::from_str(text)?;

    let topic = match (frame.topic, frame.op) {
        (Some(topic), _) => topic,
        (None, Some(op)) => return Ok(FeedMessage::Control(op)),
        (None, None) => return Err(DecodeError::MissingField("topic")),
    };
    let symbol = topic_symbol(&topic)?;

    let records = match frame.data {
        Some(Value::Array(records)) => records,
        Some(record @ Value::Object(_)) => vec![record],
        Some(_) | None => return Err(DecodeError::MissingField("data")),
    };

    let mut batch = CandleBatch::default();
    for record in records {
        match decode_candle(record, symbol) {
            Ok(candle) => batch.candles.push(candle),
            Err(e) => batch.rejected.push(e),
        }
    }
    Ok(FeedMessage::Candles(batch))
}

fn decode_candle(record: Value, topic_symbol: &str) -> Result<DecodedCandle, DecodeError> {
    let raw: RawCandle = serde_json::from_value(record)?;

    let close = number_field("close", raw.close.as_ref())?;
    let high = number_field("high", raw.high.as_ref())?;
    let low = number_field("low", raw.low.as_ref())?;

    let millis = match raw.end.as_ref().or(raw.timestamp.as_ref()) {
        Some(value) => number_field("end", Some(value))? as i64,
        None => return Err(DecodeError::MissingField("end")),
    };
    let close_time = DateTime::<Utc>::from_timestamp_millis(millis).ok_or(DecodeError::InvalidNumber {
        field: "end",
        raw: millis.to_string(),
    })?;

    let symbol = raw.symbol.unwrap_or_else(|| topic_symbol.to_string());
    let candle = Candle::new(symbol, close_time, close, high, low)?;

    Ok(DecodedCandle {
        candle,
        confirmed: raw.confirm,
    })
}

/// Prices arrive as JSON strings on most venues, numbers on some.
fn number_field(field: &'static str, value: Option<&Value>) -> Result<f64, DecodeError> {
    let invalid = |raw: String| DecodeError::InvalidNumber { field, raw };
    match value {
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| invalid(n.to_string())),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid(s.clone())),
        None | Some(Value::Null) => Err(DecodeError::MissingField(field)),
        Some(other) => Err(invalid(other.to_string())),
    }
}

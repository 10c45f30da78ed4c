//! Error types shared across the engine layers

use thiserror::Error;

/// Rejections raised while building a [`crate::models::Candle`].
#[derive(Debug, Error, PartialEq)]
pub enum CandleError {
    #[error("{field} must be a positive finite number, got {value}")]
    InvalidPrice { field: &'static str, value: f64 },
    #[error("high {high} is below low {low}")]
    InvertedRange { high: f64, low: f64 },
    #[error("symbol must not be empty")]
    EmptySymbol,
}

/// Failures decoding a single inbound stream frame or record.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` is not a number: {raw}")]
    InvalidNumber { field: &'static str, raw: String },
    #[error("topic `{0}` does not name a candle stream")]
    UnknownTopic(String),
    #[error(transparent)]
    Candle(#[from] CandleError),
}

/// Connection-level faults. All of them are recovered by reconnecting.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("failed to encode subscription: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("connect timed out after {0:?}")]
    ConnectTimeout(std::time::Duration),
    #[error("no frame received within {0:?} of heartbeat")]
    HeartbeatTimeout(std::time::Duration),
    #[error("server closed the stream")]
    Closed,
    #[error("tick channel closed")]
    ChannelClosed,
}

/// Problems with a symbol's rolling window.
#[derive(Debug, Error, PartialEq)]
pub enum WindowError {
    #[error("symbol {0} is not configured")]
    UnknownSymbol(String),
    #[error("window length mismatch: close={closes} high={highs} low={lows}")]
    LengthMismatch {
        closes: usize,
        highs: usize,
        lows: usize,
    },
}

/// Delivery failures towards the presentation layer.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("presentation layer responded with status {0}")]
    Status(u16),
}

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has invalid value `{value}`")]
    InvalidValue { key: &'static str, value: String },
    #[error("{0}")]
    Constraint(String),
}

//! Decoded candle ticks

use crate::error::CandleError;
use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;

/// One decoded market update for a configured symbol.
///
/// Fields are private so every instance has passed [`Candle::new`]'s checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    symbol: String,
    close_time: DateTime<Utc>,
    close: f64,
    high: f64,
    low: f64,
}

impl Candle {
    pub fn new(
        symbol: impl Into<String>,
        close_time: DateTime<Utc>,
        close: f64,
        high: f64,
        low: f64,
    ) -> Result<Self, CandleError> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(CandleError::EmptySymbol);
        }
        for (field, value) in [("close", close), ("high", high), ("low", low)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CandleError::InvalidPrice { field, value });
            }
        }
        if high < low {
            return Err(CandleError::InvertedRange { high, low });
        }

        Ok(Self {
            symbol,
            close_time,
            close,
            high,
            low,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn close_time(&self) -> DateTime<Utc> {
        self.close_time
    }

    pub fn close(&self) -> f64 {
        self.close
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    /// Hour of day (UTC) the candle closed in.
    pub fn close_hour(&self) -> u32 {
        self.close_time.hour()
    }
}

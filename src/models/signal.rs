//! Verdicts, alerts and the confirmation feedback loop

use crate::models::indicators::IndicatorSnapshot;
use serde::{Deserialize, Serialize};

const CONFIRM_PREFIX: &str = "confirm_long_";

/// Outcome of the entry rule for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum SignalVerdict {
    Bullish { confidence: f64 },
    NoSignal,
}

impl SignalVerdict {
    pub fn is_bullish(&self) -> bool {
        matches!(self, SignalVerdict::Bullish { .. })
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            SignalVerdict::Bullish { confidence } => Some(*confidence),
            SignalVerdict::NoSignal => None,
        }
    }
}

/// A bullish verdict that made it past the pyramiding cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub symbol: String,
    pub confidence: f64,
    /// Position in the current pyramid (1 for the first entry).
    pub entry: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSnapshot>,
}

/// Message handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub symbol: String,
    pub confidence: f64,
    pub timeframe: String,
    pub action: ConfirmAction,
}

impl AlertMessage {
    pub fn from_alert(alert: &Alert, timeframe: &str) -> Self {
        Self {
            symbol: alert.symbol.clone(),
            confidence: alert.confidence,
            timeframe: timeframe.to_string(),
            action: ConfirmAction::new(&alert.symbol, alert.confidence),
        }
    }

    /// Plain-text rendering shared by sinks that have no richer format.
    pub fn headline(&self) -> String {
        format!(
            "Bullish Trend Detected\nConfidence: {:.2}%\nPair: {}\nTimeframe: {}",
            self.confidence, self.symbol, self.timeframe
        )
    }
}

/// Confirm affordance bound to `{symbol, confidence}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmAction {
    pub label: String,
    pub callback_data: String,
}

impl ConfirmAction {
    pub fn new(symbol: &str, confidence: f64) -> Self {
        Self {
            label: format!("CONFIRM LONG {}", symbol),
            callback_data: format!("{}{:.2}_{}", CONFIRM_PREFIX, confidence, symbol),
        }
    }

    /// Recover `(symbol, confidence)` from callback data produced by [`ConfirmAction::new`].
    pub fn parse(callback_data: &str) -> Option<(String, f64)> {
        let rest = callback_data.strip_prefix(CONFIRM_PREFIX)?;
        let (confidence, symbol) = rest.split_once('_')?;
        let confidence: f64 = confidence.parse().ok()?;
        if symbol.is_empty() || !confidence.is_finite() {
            return None;
        }
        Some((symbol.to_string(), confidence))
    }
}

/// Side of a confirmed entry. The engine only ever proposes longs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Long,
}

/// A user acting on a previously dispatched alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub symbol: String,
    pub confidence: f64,
    pub actor: String,
    pub side: Side,
}

impl Confirmation {
    pub fn new(symbol: impl Into<String>, confidence: f64, actor: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            confidence,
            actor: actor.into(),
            side: Side::Long,
        }
    }

    /// Build a confirmation straight from the callback data of a pressed action.
    pub fn from_callback(callback_data: &str, actor: impl Into<String>) -> Option<Self> {
        let (symbol, confidence) = ConfirmAction::parse(callback_data)?;
        Some(Self::new(symbol, confidence, actor))
    }
}

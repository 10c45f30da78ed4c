//! Bounded per-symbol OHLC history

use crate::error::WindowError;
use crate::models::Candle;
use std::collections::VecDeque;

pub const DEFAULT_WINDOW_SIZE: usize = 100;

/// Three parallel sequences (close, high, low) capped at `capacity`.
///
/// All three are only ever pushed and evicted together.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    closes: VecDeque<f64>,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            closes: VecDeque::with_capacity(capacity + 1),
            highs: VecDeque::with_capacity(capacity + 1),
            lows: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append the candle's close/high/low, evicting the oldest bar when full.
    pub fn append(&mut self, candle: &Candle) {
        self.closes.push_back(candle.close());
        self.highs.push_back(candle.high());
        self.lows.push_back(candle.low());

        while self.closes.len() > self.capacity {
            self.closes.pop_front();
            self.highs.pop_front();
            self.lows.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Owned copy of the current sequences.
    pub fn snapshot(&self) -> Result<WindowSnapshot, WindowError> {
        let (closes, highs, lows) = (self.closes.len(), self.highs.len(), self.lows.len());
        if closes != highs || closes != lows {
            return Err(WindowError::LengthMismatch {
                closes,
                highs,
                lows,
            });
        }

        Ok(WindowSnapshot {
            closes: self.closes.iter().copied().collect(),
            highs: self.highs.iter().copied().collect(),
            lows: self.lows.iter().copied().collect(),
        })
    }
}

/// Immutable copy of a window, oldest bar first.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    closes: Vec<f64>,
    highs: Vec<f64>,
    lows: Vec<f64>,
}

impl WindowSnapshot {
    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn highs(&self) -> &[f64] {
        &self.highs
    }

    pub fn lows(&self) -> &[f64] {
        &self.lows
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// The last `n` closes, oldest first, or `None` if the window is shorter.
    pub fn last_closes(&self, n: usize) -> Option<&[f64]> {
        self.closes.len().checked_sub(n).map(|start| &self.closes[start..])
    }

    /// The last `n` lows, oldest first, or `None` if the window is shorter.
    pub fn last_lows(&self, n: usize) -> Option<&[f64]> {
        self.lows.len().checked_sub(n).map(|start| &self.lows[start..])
    }
}

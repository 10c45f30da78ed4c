//! Confidence scoring for accepted bullish verdicts.
//!
//! The score is presentational. [`UniformConfidence`] is the stock placeholder;
//! anything implementing [`ConfidenceScorer`] can replace it without touching
//! the evaluator.

use crate::models::{Candle, IndicatorSnapshot};
use rand::Rng;

pub trait ConfidenceScorer: Send + Sync {
    /// Confidence in percent for a candle that passed every entry check.
    fn score(&self, candle: &Candle, indicators: &IndicatorSnapshot) -> f64;
}

/// Uniform draw from `[min, max]`, rounded to two decimals.
#[derive(Debug, Clone, Copy)]
pub struct UniformConfidence {
    min: f64,
    max: f64,
}

impl UniformConfidence {
    pub fn new(min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self { min, max }
    }
}

impl Default for UniformConfidence {
    fn default() -> Self {
        Self::new(85.0, 95.0)
    }
}

impl ConfidenceScorer for UniformConfidence {
    fn score(&self, _candle: &Candle, _indicators: &IndicatorSnapshot) -> f64 {
        let raw = rand::thread_rng().gen_range(self.min..=self.max);
        round2(raw).clamp(self.min, self.max)
    }
}

/// Always returns the same value. Handy for deterministic replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedConfidence(pub f64);

impl ConfidenceScorer for FixedConfidence {
    fn score(&self, _candle: &Candle, _indicators: &IndicatorSnapshot) -> f64 {
        self.0
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

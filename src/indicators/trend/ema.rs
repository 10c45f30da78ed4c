//! EMA (Exponential Moving Average) indicator

use crate::common::math;

/// Calculate the latest EMA value for `period`.
///
/// Seeded by the simple average of the first `period` closes; `None` when
/// fewer than `period` closes are available.
pub fn calculate_ema(closes: &[f64], period: usize) -> Option<f64> {
    math::ema_series(closes, period).last().copied()
}

/// Calculate the latest value for several periods at once
pub fn calculate_emas(closes: &[f64], periods: &[usize]) -> Vec<Option<f64>> {
    periods
        .iter()
        .map(|&period| calculate_ema(closes, period))
        .collect()
}

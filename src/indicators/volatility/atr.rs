//! ATR (Average True Range) indicator

use crate::common::math;

/// ATR series over parallel high/low/close sequences.
///
/// True range uses the previous close when there is one; the first bar
/// falls back to `high - low`. Smoothing is Wilder's (seeded by the SMA of the
/// first `period` true ranges), so the first value lines up with bar `period - 1`.
pub fn atr_series(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let len = highs.len();
    if len != lows.len() || len != closes.len() {
        return Vec::new();
    }

    let tr_values: Vec<f64> = (0..len)
        .map(|i| {
            let prev_close = i.checked_sub(1).map(|p| closes[p]);
            math::true_range(highs[i], lows[i], prev_close)
        })
        .collect();

    math::wilder_average(&tr_values, period)
}

/// Latest ATR value, `None` with fewer than `period` bars
pub fn calculate_atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<f64> {
    atr_series(highs, lows, closes, period).last().copied()
}

/// Simple mean of the last `window` ATR values.
///
/// Computed over the full ATR series, so it needs `period + window - 1` bars.
pub fn atr_rolling_mean(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
    window: usize,
) -> Option<f64> {
    math::mean_of_last(&atr_series(highs, lows, closes, period), window)
}

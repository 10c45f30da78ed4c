//! Series math used by the indicator calculator.
//!
//! Every function is pure and returns `None` (or an empty series) instead of
//! panicking when the input is shorter than the requested period.

/// Simple average of the first `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    Some(values[..period].iter().sum::<f64>() / period as f64)
}

/// Mean of the last `count` values.
pub fn mean_of_last(values: &[f64], count: usize) -> Option<f64> {
    if count == 0 || values.len() < count {
        return None;
    }
    let tail = &values[values.len() - count..];
    Some(tail.iter().sum::<f64>() / count as f64)
}

/// EMA series with α = 2/(period+1), seeded by the SMA of the first `period` values.
///
/// The first element corresponds to `values[period - 1]`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let Some(seed) = sma(values, period) else {
        return Vec::new();
    };
    let alpha = 2.0 / (period as f64 + 1.0);

    let mut series = Vec::with_capacity(values.len() - period + 1);
    series.push(seed);
    let mut prev = seed;
    for &value in &values[period..] {
        prev = alpha * value + (1.0 - alpha) * prev;
        series.push(prev);
    }
    series
}

/// Wilder's running average: seeded by the SMA, then `(prev * (n-1) + x) / n`.
///
/// The first element corresponds to `values[period - 1]`.
pub fn wilder_average(values: &[f64], period: usize) -> Vec<f64> {
    let Some(seed) = sma(values, period) else {
        return Vec::new();
    };
    let n = period as f64;

    let mut series = Vec::with_capacity(values.len() - period + 1);
    series.push(seed);
    let mut prev = seed;
    for &value in &values[period..] {
        prev = (prev * (n - 1.0) + value) / n;
        series.push(prev);
    }
    series
}

/// Wilder's running sum used for directional movement: seeded by the plain
/// sum, then `prev - prev / n + x`.
pub fn wilder_sum(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    let n = period as f64;

    let mut prev: f64 = values[..period].iter().sum();
    let mut series = Vec::with_capacity(values.len() - period + 1);
    series.push(prev);
    for &value in &values[period..] {
        prev = prev - prev / n + value;
        series.push(prev);
    }
    series
}

/// True range of a bar. Without a previous close it collapses to `high - low`.
pub fn true_range(high: f64, low: f64, prev_close: Option<f64>) -> f64 {
    let range = high - low;
    match prev_close {
        Some(pc) => range.max((high - pc).abs()).max((low - pc).abs()),
        None => range,
    }
}

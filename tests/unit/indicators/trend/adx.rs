//! Unit tests for ADX indicator

use crate::support::{linear_bars, split};
use goldenbullx::indicators::trend::{calculate_adx, calculate_adx_default};

#[test]
fn test_adx_needs_two_periods() {
    let (closes, highs, lows) = split(&linear_bars(27, 100.0, 1.0, 1.0));
    assert!(calculate_adx(&highs, &lows, &closes, 14).is_none());

    let (closes, highs, lows) = split(&linear_bars(28, 100.0, 1.0, 1.0));
    assert!(calculate_adx(&highs, &lows, &closes, 14).is_some());
}

#[test]
fn test_adx_one_sided_trend_is_maximal() {
    let (closes, highs, lows) = split(&linear_bars(40, 100.0, 1.0, 1.0));
    let reading = calculate_adx_default(&highs, &lows, &closes).unwrap();
    assert!((reading.value - 100.0).abs() < 1e-9);
    assert!(reading.plus_di > 0.0);
    assert_eq!(reading.minus_di, 0.0);
    assert_eq!(reading.period, 14);
}

#[test]
fn test_adx_flat_market_is_zero() {
    let (closes, highs, lows) = split(&linear_bars(40, 100.0, 0.0, 1.0));
    let reading = calculate_adx(&highs, &lows, &closes, 14).unwrap();
    assert_eq!(reading.value, 0.0);
}

#[test]
fn test_adx_stays_in_range_on_choppy_data() {
    let bars: Vec<(f64, f64, f64)> = (0..60)
        .map(|i| {
            let close = 100.0 + if i % 2 == 0 { 1.5 } else { -1.0 } + (i % 7) as f64 * 0.3;
            (close, close + 0.8, close - 0.6)
        })
        .collect();
    let (closes, highs, lows) = split(&bars);
    let reading = calculate_adx(&highs, &lows, &closes, 14).unwrap();
    assert!((0.0..=100.0).contains(&reading.value));
}

#[test]
fn test_adx_rejects_mismatched_lengths() {
    let (closes, highs, mut lows) = split(&linear_bars(40, 100.0, 1.0, 1.0));
    lows.pop();
    assert!(calculate_adx(&highs, &lows, &closes, 14).is_none());
}

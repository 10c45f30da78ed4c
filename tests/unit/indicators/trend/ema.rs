//! Unit tests for EMA indicator

use goldenbullx::indicators::trend::{calculate_ema, calculate_emas};

#[test]
fn test_ema_insufficient_data() {
    let closes = vec![100.0; 49];
    assert!(calculate_ema(&closes, 50).is_none());
}

#[test]
fn test_ema_defined_at_exactly_period() {
    let closes = vec![100.0; 50];
    assert_eq!(calculate_ema(&closes, 50), Some(100.0));
}

#[test]
fn test_ema_tracks_linear_series_with_lag() {
    let closes: Vec<f64> = (1..=10).map(f64::from).collect();
    // α = 0.5 on a unit slope settles one step behind
    assert_eq!(calculate_ema(&closes, 3), Some(9.0));
}

#[test]
fn test_ema_responds_to_latest_close() {
    let mut closes = vec![100.0; 30];
    closes.push(110.0);
    let ema = calculate_ema(&closes, 21).unwrap();
    assert!(ema > 100.0 && ema < 110.0);
    // 100 + (2/22) * 10
    assert!((ema - (100.0 + 10.0 * 2.0 / 22.0)).abs() < 1e-9);
}

#[test]
fn test_calculate_multiple_emas() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 0.1).collect();
    let emas = calculate_emas(&closes, &[21, 34, 50]);
    assert_eq!(emas.len(), 3);
    assert!(emas[0].is_some());
    assert!(emas[1].is_some());
    assert!(emas[2].is_none());
}

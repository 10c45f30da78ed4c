//! Unit tests for candle validation

use crate::support::at_hour;
use goldenbullx::error::CandleError;
use goldenbullx::models::Candle;

#[test]
fn valid_candle_exposes_fields() {
    let candle = Candle::new("ETHUSDT", at_hour(7), 3000.5, 3010.0, 2990.0).unwrap();
    assert_eq!(candle.symbol(), "ETHUSDT");
    assert_eq!(candle.close(), 3000.5);
    assert_eq!(candle.high(), 3010.0);
    assert_eq!(candle.low(), 2990.0);
    assert_eq!(candle.close_hour(), 7);
}

#[test]
fn non_positive_prices_are_rejected() {
    assert_eq!(
        Candle::new("BTCUSDT", at_hour(12), -1.0, 1.0, 0.5).unwrap_err(),
        CandleError::InvalidPrice { field: "close", value: -1.0 }
    );
    assert_eq!(
        Candle::new("BTCUSDT", at_hour(12), 1.0, 1.0, 0.0).unwrap_err(),
        CandleError::InvalidPrice { field: "low", value: 0.0 }
    );
}

#[test]
fn non_finite_prices_are_rejected() {
    assert!(matches!(
        Candle::new("BTCUSDT", at_hour(12), 1.0, f64::NAN, 0.5),
        Err(CandleError::InvalidPrice { field: "high", .. })
    ));
    assert!(Candle::new("BTCUSDT", at_hour(12), f64::INFINITY, 1.0, 0.5).is_err());
}

#[test]
fn inverted_range_is_rejected() {
    assert_eq!(
        Candle::new("BTCUSDT", at_hour(12), 1.0, 0.9, 1.1).unwrap_err(),
        CandleError::InvertedRange { high: 0.9, low: 1.1 }
    );
}

#[test]
fn empty_symbol_is_rejected() {
    assert_eq!(
        Candle::new("", at_hour(12), 1.0, 1.1, 0.9).unwrap_err(),
        CandleError::EmptySymbol
    );
}

#[test]
fn validated_candle_serializes_its_fields() {
    let candle = Candle::new("ETHUSDT", at_hour(7), 3000.5, 3010.0, 2990.0).unwrap();
    let json = serde_json::to_value(&candle).unwrap();
    assert_eq!(json["symbol"], "ETHUSDT");
    assert_eq!(json["close"], 3000.5);
    assert_eq!(json["low"], 2990.0);
}

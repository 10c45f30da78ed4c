//! Indicator calculator: EMA, ATR and ADX over a rolling window snapshot.

pub mod snapshot;
pub mod trend;
pub mod volatility;

pub use snapshot::IndicatorCalculator;

//! Shared data models spanning the engine layers.

pub mod candle;
pub mod indicators;
pub mod signal;

pub use candle::Candle;
pub use indicators::IndicatorSnapshot;
pub use signal::{Alert, AlertMessage, ConfirmAction, Confirmation, Side, SignalVerdict};

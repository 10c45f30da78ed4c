//! Full indicator snapshot for one window

use crate::engine::window::WindowSnapshot;
use crate::indicators::trend::{calculate_adx, calculate_ema};
use crate::indicators::volatility::atr_series;
use crate::common::math;
use crate::models::indicators::IndicatorSnapshot;

pub const EMA_TREND_PERIOD: usize = 50;
pub const EMA_FAST_PERIOD: usize = 21;
pub const EMA_MID_PERIOD: usize = 34;
pub const ATR_PERIOD: usize = 14;
pub const ATR_MEAN_WINDOW: usize = 20;
pub const ADX_PERIOD: usize = 14;

/// Smallest window any indicator can be defined on.
pub const MIN_INDICATOR_PERIOD: usize = 14;

/// Stateless calculator. Every call recomputes from the whole snapshot.
pub struct IndicatorCalculator;

impl IndicatorCalculator {
    pub fn compute(window: &WindowSnapshot) -> IndicatorSnapshot {
        let (closes, highs, lows) = (window.closes(), window.highs(), window.lows());
        if closes.len() < MIN_INDICATOR_PERIOD {
            return IndicatorSnapshot::default();
        }

        let atr = atr_series(highs, lows, closes, ATR_PERIOD);

        IndicatorSnapshot {
            ema_50: calculate_ema(closes, EMA_TREND_PERIOD),
            ema_21: calculate_ema(closes, EMA_FAST_PERIOD),
            ema_34: calculate_ema(closes, EMA_MID_PERIOD),
            atr_14: atr.last().copied(),
            atr_14_mean_20: math::mean_of_last(&atr, ATR_MEAN_WINDOW),
            adx_14: calculate_adx(highs, lows, closes, ADX_PERIOD).map(|r| r.value),
        }
    }
}

//! Rule-based entry evaluation

use crate::engine::window::WindowSnapshot;
use crate::models::{Candle, IndicatorSnapshot, SignalVerdict};
use crate::signals::scoring::{ConfidenceScorer, UniformConfidence};
use crate::signals::session::SessionWindow;
use std::fmt;

pub const DEFAULT_ADX_THRESHOLD: f64 = 10.0;

/// Entry conditions in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryCheck {
    SufficientHistory,
    RecentLowBreakout,
    LiquiditySweep,
    TrendFilter,
    StrengthFilter,
    VolatilityFilter,
    SessionFilter,
}

impl fmt::Display for EntryCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryCheck::SufficientHistory => "sufficient_history",
            EntryCheck::RecentLowBreakout => "recent_low_breakout",
            EntryCheck::LiquiditySweep => "liquidity_sweep",
            EntryCheck::TrendFilter => "trend_filter",
            EntryCheck::StrengthFilter => "strength_filter",
            EntryCheck::VolatilityFilter => "volatility_filter",
            EntryCheck::SessionFilter => "session_filter",
        };
        f.write_str(name)
    }
}

pub struct SignalEvaluator {
    session: SessionWindow,
    adx_threshold: f64,
    scorer: Box<dyn ConfidenceScorer>,
}

impl SignalEvaluator {
    pub fn new(session: SessionWindow, adx_threshold: f64) -> Self {
        Self {
            session,
            adx_threshold,
            scorer: Box::new(UniformConfidence::default()),
        }
    }

    pub fn with_scorer(mut self, scorer: impl ConfidenceScorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    /// Verdict for `candle`, the latest bar of `window`.
    pub fn evaluate(
        &self,
        candle: &Candle,
        indicators: &IndicatorSnapshot,
        window: &WindowSnapshot,
    ) -> SignalVerdict {
        self.assess(candle, indicators, window).0
    }

    /// Verdict together with the check that rejected it, if any.
    pub fn assess(
        &self,
        candle: &Candle,
        indicators: &IndicatorSnapshot,
        window: &WindowSnapshot,
    ) -> (SignalVerdict, Option<EntryCheck>) {
        match self.first_failed_check(candle, indicators, window) {
            Some(check) => (SignalVerdict::NoSignal, Some(check)),
            None => {
                let confidence = self.scorer.score(candle, indicators);
                (SignalVerdict::Bullish { confidence }, None)
            }
        }
    }

    /// The first entry condition that does not hold, or `None` if all pass.
    pub fn first_failed_check(
        &self,
        candle: &Candle,
        indicators: &IndicatorSnapshot,
        window: &WindowSnapshot,
    ) -> Option<EntryCheck> {
        let (Some(closes), Some(lows)) = (window.last_closes(3), window.last_lows(2)) else {
            return Some(EntryCheck::SufficientHistory);
        };
        let (Some(ema_50), Some(adx), Some(atr), Some(atr_mean)) = (
            indicators.ema_50,
            indicators.adx_14,
            indicators.atr_14,
            indicators.atr_14_mean_20,
        ) else {
            return Some(EntryCheck::SufficientHistory);
        };

        let close = candle.close();

        let recent_low = lows.iter().copied().fold(f64::INFINITY, f64::min);
        if close <= recent_low {
            return Some(EntryCheck::RecentLowBreakout);
        }

        // closes[0] and closes[1] are the two bars before the current one
        let swept_high = closes[0].max(closes[1]);
        if close <= swept_high {
            return Some(EntryCheck::LiquiditySweep);
        }

        if close <= ema_50 {
            return Some(EntryCheck::TrendFilter);
        }

        if adx <= self.adx_threshold {
            return Some(EntryCheck::StrengthFilter);
        }

        if atr <= atr_mean {
            return Some(EntryCheck::VolatilityFilter);
        }

        if !self.session.contains(candle.close_hour()) {
            return Some(EntryCheck::SessionFilter);
        }

        None
    }
}

impl Default for SignalEvaluator {
    fn default() -> Self {
        Self::new(SessionWindow::default(), DEFAULT_ADX_THRESHOLD)
    }
}

//! The single evaluation loop.
//!
//! Each inbound tick drives exactly one synchronous pass: append to the
//! window, recompute indicators, evaluate the entry rule, apply the
//! pyramiding cap, and hand accepted alerts to the dispatcher. Nothing else
//! touches the registry, so no locks are needed.

use crate::engine::pyramiding::PyramidingDecision;
use crate::engine::registry::SymbolRegistry;
use crate::indicators::IndicatorCalculator;
use crate::metrics::Metrics;
use crate::models::{Alert, Candle};
use crate::services::dispatch::DispatcherHandle;
use crate::signals::evaluator::{EntryCheck, SignalEvaluator};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// What happened to one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Bullish and under the cap; the alert was handed to the dispatcher.
    Emitted(Alert),
    /// Bullish but the symbol is already at its pyramiding cap.
    Suppressed,
    /// Some entry check failed; the symbol's entry count is now zero.
    NoSignal(EntryCheck),
    /// The tick never reached the evaluator.
    Rejected,
}

pub struct SignalPipeline {
    registry: SymbolRegistry,
    evaluator: SignalEvaluator,
    dispatcher: Option<DispatcherHandle>,
    metrics: Option<Arc<Metrics>>,
}

impl SignalPipeline {
    pub fn new(registry: SymbolRegistry, evaluator: SignalEvaluator) -> Self {
        Self {
            registry,
            evaluator,
            dispatcher: None,
            metrics: None,
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: DispatcherHandle) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    /// Consume ticks until the feed side of the channel is dropped.
    pub async fn run(mut self, mut ticks: mpsc::Receiver<Candle>) {
        info!(symbols = ?self.registry.symbols().collect::<Vec<_>>(), "Signal pipeline started");
        while let Some(candle) = ticks.recv().await {
            self.on_tick(candle);
        }
        info!("Signal pipeline stopped: tick stream closed");
    }

    pub fn on_tick(&mut self, candle: Candle) -> TickOutcome {
        let symbol = candle.symbol().to_string();

        if let Err(e) = self.registry.append(&candle) {
            warn!(symbol = %symbol, error = %e, "Skipping tick");
            self.count(|m| m.ticks_rejected_total.inc());
            return TickOutcome::Rejected;
        }

        let window = match self.registry.snapshot(&symbol) {
            Ok(window) => window,
            Err(e) => {
                error!(symbol = %symbol, error = %e, "Window invariant violated, skipping tick");
                self.count(|m| m.ticks_rejected_total.inc());
                return TickOutcome::Rejected;
            }
        };

        let indicators = IndicatorCalculator::compute(&window);
        let (verdict, failed) = self.evaluator.assess(&candle, &indicators, &window);
        self.count(|m| m.ticks_processed_total.inc());

        let decision = match self.registry.apply_verdict(&symbol, &verdict) {
            Ok(decision) => decision,
            Err(e) => {
                error!(symbol = %symbol, error = %e, "Pyramiding state missing, skipping tick");
                self.count(|m| m.ticks_rejected_total.inc());
                return TickOutcome::Rejected;
            }
        };

        match decision {
            PyramidingDecision::Emit(entry) => {
                let confidence = verdict.confidence().unwrap_or_default();
                let alert = Alert {
                    symbol: symbol.clone(),
                    confidence,
                    entry,
                    indicators: Some(indicators),
                };
                info!(symbol = %symbol, confidence, entry, close = candle.close(), "Bullish signal");
                self.count(|m| m.alerts_emitted_total.inc());
                if let Some(dispatcher) = &self.dispatcher {
                    dispatcher.submit(alert.clone());
                }
                TickOutcome::Emitted(alert)
            }
            PyramidingDecision::Suppress => {
                debug!(symbol = %symbol, "Bullish signal suppressed by pyramiding cap");
                self.count(|m| m.alerts_suppressed_total.inc());
                TickOutcome::Suppressed
            }
            PyramidingDecision::Reset(previous) => {
                let check = failed.unwrap_or(EntryCheck::SufficientHistory);
                if previous > 0 {
                    info!(symbol = %symbol, previous, failed = %check, "Pyramid reset");
                } else {
                    debug!(symbol = %symbol, failed = %check, window = window.len(), "No signal");
                }
                TickOutcome::NoSignal(check)
            }
        }
    }

    fn count(&self, f: impl FnOnce(&Metrics)) {
        if let Some(metrics) = &self.metrics {
            f(metrics);
        }
    }
}

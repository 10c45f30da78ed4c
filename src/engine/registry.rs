//! Single owner of every symbol's window and pyramiding state

use crate::engine::pyramiding::{PyramidingDecision, PyramidingState};
use crate::engine::window::{RollingWindow, WindowSnapshot};
use crate::error::WindowError;
use crate::models::{Candle, SignalVerdict};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SymbolState {
    window: RollingWindow,
    pyramiding: PyramidingState,
}

impl SymbolState {
    fn new(window_size: usize, max_entries: u8) -> Self {
        Self {
            window: RollingWindow::new(window_size),
            pyramiding: PyramidingState::new(max_entries),
        }
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    pub fn entry_count(&self) -> u8 {
        self.pyramiding.entry_count()
    }
}

/// Registry keyed by symbol. The configured set is fixed at construction.
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    states: HashMap<String, SymbolState>,
}

impl SymbolRegistry {
    pub fn new<I, S>(symbols: I, window_size: usize, max_entries: u8) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let states = symbols
            .into_iter()
            .map(|s| (s.into(), SymbolState::new(window_size, max_entries)))
            .collect();
        Self { states }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.states.contains_key(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolState> {
        self.states.get(symbol)
    }

    pub fn append(&mut self, candle: &Candle) -> Result<(), WindowError> {
        let state = self.state_mut(candle.symbol())?;
        state.window.append(candle);
        Ok(())
    }

    pub fn snapshot(&self, symbol: &str) -> Result<WindowSnapshot, WindowError> {
        self.states
            .get(symbol)
            .ok_or_else(|| WindowError::UnknownSymbol(symbol.to_string()))?
            .window
            .snapshot()
    }

    pub fn apply_verdict(
        &mut self,
        symbol: &str,
        verdict: &SignalVerdict,
    ) -> Result<PyramidingDecision, WindowError> {
        Ok(self.state_mut(symbol)?.pyramiding.apply(verdict))
    }

    pub fn entry_count(&self, symbol: &str) -> Option<u8> {
        self.states.get(symbol).map(SymbolState::entry_count)
    }

    fn state_mut(&mut self, symbol: &str) -> Result<&mut SymbolState, WindowError> {
        self.states
            .get_mut(symbol)
            .ok_or_else(|| WindowError::UnknownSymbol(symbol.to_string()))
    }
}

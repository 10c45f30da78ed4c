//! Pyramiding cap: bounded repeated alerts per symbol

use crate::models::SignalVerdict;

pub const DEFAULT_MAX_ENTRIES: u8 = 2;

/// Hard ceiling on entries per pyramid. Configured caps are clamped to `1..=MAX_ENTRIES_LIMIT`.
pub const MAX_ENTRIES_LIMIT: u8 = 2;

/// What the state machine did with a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PyramidingDecision {
    /// Bullish and under the cap; carries the new entry count.
    Emit(u8),
    /// Bullish but already at the cap.
    Suppress,
    /// No signal; carries the count that was cleared.
    Reset(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyramidingState {
    entry_count: u8,
    max_entries: u8,
}

impl PyramidingState {
    pub fn new(max_entries: u8) -> Self {
        Self {
            entry_count: 0,
            max_entries: max_entries.clamp(1, MAX_ENTRIES_LIMIT),
        }
    }

    pub fn entry_count(&self) -> u8 {
        self.entry_count
    }

    pub fn max_entries(&self) -> u8 {
        self.max_entries
    }

    pub fn apply(&mut self, verdict: &SignalVerdict) -> PyramidingDecision {
        match verdict {
            SignalVerdict::Bullish { .. } if self.entry_count < self.max_entries => {
                self.entry_count += 1;
                PyramidingDecision::Emit(self.entry_count)
            }
            SignalVerdict::Bullish { .. } => PyramidingDecision::Suppress,
            SignalVerdict::NoSignal => {
                let previous = self.entry_count;
                self.entry_count = 0;
                PyramidingDecision::Reset(previous)
            }
        }
    }
}

impl Default for PyramidingState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

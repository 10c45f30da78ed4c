//! Per-symbol state and the evaluation loop.

pub mod pipeline;
pub mod pyramiding;
pub mod registry;
pub mod window;

pub use pipeline::{SignalPipeline, TickOutcome};
pub use pyramiding::{PyramidingDecision, PyramidingState};
pub use registry::{SymbolRegistry, SymbolState};
pub use window::{RollingWindow, WindowSnapshot, DEFAULT_WINDOW_SIZE};

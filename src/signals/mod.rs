//! Entry-rule evaluation.

pub mod evaluator;
pub mod scoring;
pub mod session;

pub use evaluator::{EntryCheck, SignalEvaluator};
pub use scoring::{ConfidenceScorer, FixedConfidence, UniformConfidence};
pub use session::SessionWindow;

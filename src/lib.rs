//! GoldenBullX streaming signal engine.
//!
//! Candle ticks arrive over a single multiplexed websocket, land in a bounded
//! per-symbol rolling window, get turned into EMA/ATR/ADX snapshots and are
//! run through a rule-based entry check. Accepted bullish verdicts pass a
//! pyramiding cap before being handed to the presentation layer.

pub mod common;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

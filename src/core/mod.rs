//! Operational surface: health and metrics over HTTP

pub mod http;

pub use http::*;

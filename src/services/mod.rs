//! Boundary services: the market feed in, alert dispatch out.

pub mod dispatch;
pub mod feed;

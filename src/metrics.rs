//! Prometheus metrics for the feed, the evaluation loop and alert delivery

use prometheus::{Encoder, Gauge, IntCounter, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub feed_connected: Gauge,
    pub feed_messages_total: IntCounter,
    pub feed_malformed_total: IntCounter,
    pub feed_reconnects_total: IntCounter,
    pub ticks_processed_total: IntCounter,
    pub ticks_rejected_total: IntCounter,
    pub alerts_emitted_total: IntCounter,
    pub alerts_suppressed_total: IntCounter,
    pub alerts_dropped_total: IntCounter,
    pub confirmations_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("goldenbullx".to_string()), None)?;

        let feed_connected = Gauge::new("feed_connected", "1 while the market stream is connected")?;
        let feed_messages_total = IntCounter::new("feed_messages_total", "Inbound stream frames")?;
        let feed_malformed_total =
            IntCounter::new("feed_malformed_total", "Frames or records dropped as malformed")?;
        let feed_reconnects_total =
            IntCounter::new("feed_reconnects_total", "Reconnect attempts after a failure")?;
        let ticks_processed_total =
            IntCounter::new("ticks_processed_total", "Ticks run through the evaluator")?;
        let ticks_rejected_total = IntCounter::new(
            "ticks_rejected_total",
            "Ticks skipped for unknown symbols or window faults",
        )?;
        let alerts_emitted_total = IntCounter::new("alerts_emitted_total", "Alerts accepted by the pyramiding cap")?;
        let alerts_suppressed_total =
            IntCounter::new("alerts_suppressed_total", "Bullish verdicts suppressed by the cap")?;
        let alerts_dropped_total =
            IntCounter::new("alerts_dropped_total", "Alerts lost to a full queue or failed delivery")?;
        let confirmations_total =
            IntCounter::new("confirmations_total", "Confirmations forwarded to the log")?;

        registry.register(Box::new(feed_connected.clone()))?;
        registry.register(Box::new(feed_messages_total.clone()))?;
        registry.register(Box::new(feed_malformed_total.clone()))?;
        registry.register(Box::new(feed_reconnects_total.clone()))?;
        registry.register(Box::new(ticks_processed_total.clone()))?;
        registry.register(Box::new(ticks_rejected_total.clone()))?;
        registry.register(Box::new(alerts_emitted_total.clone()))?;
        registry.register(Box::new(alerts_suppressed_total.clone()))?;
        registry.register(Box::new(alerts_dropped_total.clone()))?;
        registry.register(Box::new(confirmations_total.clone()))?;

        Ok(Self {
            registry,
            feed_connected,
            feed_messages_total,
            feed_malformed_total,
            feed_reconnects_total,
            ticks_processed_total,
            ticks_rejected_total,
            alerts_emitted_total,
            alerts_suppressed_total,
            alerts_dropped_total,
            confirmations_total,
        })
    }

    /// Prometheus text exposition of every registered metric
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

//! Market stream connection loop
//!
//! Connects, subscribes to one candle topic per symbol, forwards decoded
//! candles in arrival order, and reconnects with bounded exponential backoff
//! whenever the connection errors, closes, or goes silent past the heartbeat
//! timeout. Runs until shutdown is signalled.

use crate::error::FeedError;
use crate::metrics::Metrics;
use crate::models::Candle;
use crate::services::feed::messages::{decode_frame, FeedMessage, SubscribeRequest, PING_FRAME};
use backon::{BackoffBuilder, ExponentialBackoff, ExponentialBuilder};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url: String,
    pub symbols: Vec<String>,
    pub interval: String,
    pub heartbeat_interval: Duration,
    pub heartbeat_timeout: Duration,
    pub reconnect_min_delay: Duration,
    pub reconnect_max_delay: Duration,
    /// Forward only candles the venue marks as closed. The venue pushes the
    /// open bar about once a second, so without this every push is a new bar.
    pub confirmed_only: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "wss://stream.bybit.com/v5/public/linear".to_string(),
            symbols: vec!["BTCUSDT".to_string()],
            interval: "3".to_string(),
            heartbeat_interval: Duration::from_secs(20),
            heartbeat_timeout: Duration::from_secs(10),
            reconnect_min_delay: Duration::from_secs(1),
            reconnect_max_delay: Duration::from_secs(30),
            confirmed_only: true,
        }
    }
}

enum SessionEnd {
    Shutdown,
}

pub struct FeedClient {
    config: FeedConfig,
    metrics: Option<Arc<Metrics>>,
}

impl FeedClient {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Run until `shutdown` flips to `true` (or its sender is dropped).
    ///
    /// Only returns an error when the tick receiver is gone, since there is
    /// nobody left to deliver to.
    pub async fn run(
        &self,
        ticks: mpsc::Sender<Candle>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), FeedError> {
        let mut backoff = self.backoff();
        let mut attempt: u32 = 0;

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.stream_session(&ticks, &mut shutdown, &mut backoff).await {
                Ok(SessionEnd::Shutdown) => break,
                Err(FeedError::ChannelClosed) => {
                    self.set_connected(false);
                    return Err(FeedError::ChannelClosed);
                }
                Err(e) => {
                    self.set_connected(false);
                    attempt += 1;
                    let delay = backoff
                        .next()
                        .unwrap_or(self.config.reconnect_max_delay);
                    warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Market stream lost, reconnecting"
                    );
                    if let Some(metrics) = &self.metrics {
                        metrics.feed_reconnects_total.inc();
                    }

                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = shutdown.changed() => break,
                    }
                }
            }
        }

        self.set_connected(false);
        info!("Market stream stopped");
        Ok(())
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBuilder::default()
            .with_min_delay(self.config.reconnect_min_delay)
            .with_max_delay(self.config.reconnect_max_delay)
            .with_factor(2.0)
            .with_max_times(usize::MAX)
            .build()
    }

    async fn stream_session(
        &self,
        ticks: &mpsc::Sender<Candle>,
        shutdown: &mut watch::Receiver<bool>,
        backoff: &mut ExponentialBackoff,
    ) -> Result<SessionEnd, FeedError> {
        info!(url = %self.config.url, "Connecting to market stream");
        let connect = connect_async(self.config.url.as_str());
        let (ws, _) = tokio::select! {
            connected = tokio::time::timeout(CONNECT_TIMEOUT, connect) => {
                connected.map_err(|_| FeedError::ConnectTimeout(CONNECT_TIMEOUT))??
            }
            _ = shutdown.changed() => return Ok(SessionEnd::Shutdown),
        };
        let (mut write, mut read) = ws.split();

        let request = SubscribeRequest::candles(&self.config.interval, &self.config.symbols);
        write.send(Message::Text(serde_json::to_string(&request)?)).await?;
        info!(topics = ?request.args, "Market stream connected, subscribed");

        self.set_connected(true);
        *backoff = self.backoff();

        let timeout = self.config.heartbeat_timeout;
        let mut heartbeat = tokio::time::interval_at(
            Instant::now() + self.config.heartbeat_interval,
            self.config.heartbeat_interval,
        );
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut reply_deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(SessionEnd::Shutdown);
                }
                _ = heartbeat.tick() => {
                    write.send(Message::Text(PING_FRAME.to_string())).await?;
                    reply_deadline.get_or_insert(Instant::now() + timeout);
                }
                _ = wait_until(reply_deadline) => {
                    return Err(FeedError::HeartbeatTimeout(timeout));
                }
                frame = read.next() => {
                    let frame = match frame {
                        Some(frame) => frame?,
                        None => return Err(FeedError::Closed),
                    };
                    reply_deadline = None;

                    match frame {
                        Message::Text(text) => self.handle_text(&text, ticks).await?,
                        Message::Close(reason) => {
                            info!(reason = ?reason, "Market stream closed by server");
                            return Err(FeedError::Closed);
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    async fn handle_text(&self, text: &str, ticks: &mpsc::Sender<Candle>) -> Result<(), FeedError> {
        if let Some(metrics) = &self.metrics {
            metrics.feed_messages_total.inc();
        }

        let batch = match decode_frame(text) {
            Ok(FeedMessage::Candles(batch)) => batch,
            Ok(FeedMessage::Control(op)) => {
                debug!(op = %op, "Control message");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, "Dropping malformed frame");
                self.count_malformed(1);
                return Ok(());
            }
        };

        if !batch.rejected.is_empty() {
            for e in &batch.rejected {
                warn!(error = %e, "Dropping malformed candle record");
            }
            self.count_malformed(batch.rejected.len() as u64);
        }

        for decoded in batch.candles {
            if self.config.confirmed_only && !decoded.confirmed {
                continue;
            }
            ticks
                .send(decoded.candle)
                .await
                .map_err(|_| FeedError::ChannelClosed)?;
        }
        Ok(())
    }

    fn count_malformed(&self, n: u64) {
        if let Some(metrics) = &self.metrics {
            metrics.feed_malformed_total.inc_by(n);
        }
    }

    fn set_connected(&self, connected: bool) {
        if let Some(metrics) = &self.metrics {
            metrics.feed_connected.set(if connected { 1.0 } else { 0.0 });
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

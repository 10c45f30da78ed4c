//! Candle feed adapter

pub mod client;
pub mod messages;

pub use client::{FeedClient, FeedConfig};
pub use messages::{decode_frame, CandleBatch, DecodedCandle, FeedMessage, SubscribeRequest};

use crate::error::FeedError;
use crate::models::Candle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Owns the background connection task and its shutdown signal.
///
/// There should be exactly one of these per process: the design assumes a
/// single multiplexed stream.
pub struct FeedService {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<Result<(), FeedError>>>,
}

impl FeedService {
    /// Spawn the connection loop, forwarding candles into `ticks`.
    pub fn start(client: FeedClient, ticks: mpsc::Sender<Candle>) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move { client.run(ticks, shutdown_rx).await });
        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Close the stream and stop retrying. Waits for the loop to exit.
    pub async fn stop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            match handle.await {
                Ok(Ok(())) => info!("Feed service stopped"),
                Ok(Err(e)) => warn!(error = %e, "Feed service stopped with error"),
                Err(e) => warn!(error = %e, "Feed task panicked or was cancelled"),
            }
        }
    }
}

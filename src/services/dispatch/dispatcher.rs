//! Non-blocking alert dispatcher.
//!
//! The evaluation loop only ever `try_send`s into bounded queues; a
//! background task drains them into the sink and the confirmation log.
//! Delivery failures are logged and dropped.

use crate::metrics::Metrics;
use crate::models::{Alert, AlertMessage, Confirmation};
use crate::services::dispatch::sink::{AlertSink, ConfirmationLog};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Cheap-to-clone sending side held by the evaluation loop and the UI.
#[derive(Clone)]
pub struct DispatcherHandle {
    alerts: mpsc::Sender<Alert>,
    confirmations: mpsc::Sender<Confirmation>,
    metrics: Option<Arc<Metrics>>,
}

impl DispatcherHandle {
    /// Queue an alert without waiting. Returns `false` if it was dropped.
    pub fn submit(&self, alert: Alert) -> bool {
        match self.alerts.try_send(alert) {
            Ok(()) => true,
            Err(TrySendError::Full(alert)) => {
                warn!(symbol = %alert.symbol, "Alert queue full, dropping alert");
                self.record_drop();
                false
            }
            Err(TrySendError::Closed(alert)) => {
                warn!(symbol = %alert.symbol, "Alert dispatcher stopped, dropping alert");
                self.record_drop();
                false
            }
        }
    }

    /// Feed a user confirmation back for logging. Never validated here.
    pub fn confirm(&self, confirmation: Confirmation) -> bool {
        match self.confirmations.try_send(confirmation) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Dropping confirmation");
                false
            }
        }
    }

    fn record_drop(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.alerts_dropped_total.inc();
        }
    }
}

pub struct AlertDispatcher {
    sink: Arc<dyn AlertSink>,
    log: Arc<dyn ConfirmationLog>,
    timeframe: String,
    metrics: Option<Arc<Metrics>>,
}

impl AlertDispatcher {
    pub fn new(sink: Arc<dyn AlertSink>, log: Arc<dyn ConfirmationLog>, timeframe: impl Into<String>) -> Self {
        Self {
            sink,
            log,
            timeframe: timeframe.into(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Start the delivery task. It exits once every handle has been dropped.
    pub fn spawn(self, capacity: usize) -> (DispatcherHandle, JoinHandle<()>) {
        let capacity = capacity.max(1);
        let (alert_tx, alert_rx) = mpsc::channel(capacity);
        let (confirm_tx, confirm_rx) = mpsc::channel(capacity);

        let handle = DispatcherHandle {
            alerts: alert_tx,
            confirmations: confirm_tx,
            metrics: self.metrics.clone(),
        };
        let task = tokio::spawn(self.run(alert_rx, confirm_rx));
        (handle, task)
    }

    async fn run(
        self,
        mut alerts: mpsc::Receiver<Alert>,
        mut confirmations: mpsc::Receiver<Confirmation>,
    ) {
        let mut alerts_open = true;
        let mut confirmations_open = true;

        while alerts_open || confirmations_open {
            tokio::select! {
                alert = alerts.recv(), if alerts_open => match alert {
                    Some(alert) => self.deliver(alert).await,
                    None => alerts_open = false,
                },
                confirmation = confirmations.recv(), if confirmations_open => match confirmation {
                    Some(confirmation) => self.record(confirmation).await,
                    None => confirmations_open = false,
                },
            }
        }

        debug!("Alert dispatcher stopped");
    }

    async fn deliver(&self, alert: Alert) {
        let message = AlertMessage::from_alert(&alert, &self.timeframe);
        match self.sink.deliver(&message).await {
            Ok(()) => {
                info!(symbol = %message.symbol, confidence = message.confidence, entry = alert.entry, "Alert delivered");
            }
            Err(e) => {
                warn!(symbol = %message.symbol, error = %e, "Alert delivery failed, dropping");
                if let Some(metrics) = &self.metrics {
                    metrics.alerts_dropped_total.inc();
                }
            }
        }
    }

    async fn record(&self, confirmation: Confirmation) {
        match self.log.record(&confirmation).await {
            Ok(()) => {
                if let Some(metrics) = &self.metrics {
                    metrics.confirmations_total.inc();
                }
            }
            Err(e) => {
                warn!(symbol = %confirmation.symbol, actor = %confirmation.actor, error = %e, "Failed to record confirmation");
            }
        }
    }
}

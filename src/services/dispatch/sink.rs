//! Presentation-layer and confirmation-log collaborators

use crate::error::DispatchError;
use crate::models::{AlertMessage, Confirmation};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Receives alerts accepted by the engine.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, message: &AlertMessage) -> Result<(), DispatchError>;
}

/// Receives confirmations coming back from the presentation layer.
#[async_trait]
pub trait ConfirmationLog: Send + Sync {
    async fn record(&self, confirmation: &Confirmation) -> Result<(), DispatchError>;
}

/// Writes alerts to the structured log. Used when no webhook is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingAlertSink;

#[async_trait]
impl AlertSink for LoggingAlertSink {
    async fn deliver(&self, message: &AlertMessage) -> Result<(), DispatchError> {
        info!(
            symbol = %message.symbol,
            confidence = message.confidence,
            timeframe = %message.timeframe,
            callback = %message.action.callback_data,
            "{}",
            message.headline()
        );
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingConfirmationLog;

#[async_trait]
impl ConfirmationLog for LoggingConfirmationLog {
    async fn record(&self, confirmation: &Confirmation) -> Result<(), DispatchError> {
        info!(
            actor = %confirmation.actor,
            side = ?confirmation.side,
            symbol = %confirmation.symbol,
            confidence = confirmation.confidence,
            "Entry confirmed"
        );
        Ok(())
    }
}

/// POSTs each alert as JSON to a presentation-layer endpoint.
pub struct WebhookAlertSink {
    url: String,
    client: reqwest::Client,
}

impl WebhookAlertSink {
    pub fn new(url: impl Into<String>) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl AlertSink for WebhookAlertSink {
    async fn deliver(&self, message: &AlertMessage) -> Result<(), DispatchError> {
        let response = self.client.post(&self.url).json(message).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status(status.as_u16()));
        }
        Ok(())
    }
}

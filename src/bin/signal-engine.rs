//! GoldenBullX Signal Engine
//!
//! Holds the single market-stream connection, runs every tick through the
//! evaluation loop and hands accepted alerts to the presentation layer.
//! This service should run as a singleton (one instance).

use dotenvy::dotenv;
use goldenbullx::config::EngineConfig;
use goldenbullx::core::http::{start_server, AppState};
use goldenbullx::engine::{SignalPipeline, SymbolRegistry};
use goldenbullx::logging;
use goldenbullx::metrics::Metrics;
use goldenbullx::services::dispatch::{
    AlertDispatcher, AlertSink, LoggingAlertSink, LoggingConfirmationLog, WebhookAlertSink,
};
use goldenbullx::services::feed::{FeedClient, FeedService};
use goldenbullx::signals::SignalEvaluator;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

const TICK_CHANNEL_CAPACITY: usize = 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let config = EngineConfig::from_env()?;
    logging::init_logging(&config.environment);

    info!("Starting GoldenBullX Signal Engine");
    info!(environment = %config.environment, "Environment");
    info!(
        symbols = ?config.feed.symbols,
        timeframe = %config.timeframe,
        window_size = config.window_size,
        max_entries = config.max_entries,
        adx_threshold = config.adx_threshold,
        session_start = config.session.start_hour(),
        session_end = config.session.end_hour(),
        "Engine configuration"
    );

    let metrics = Arc::new(Metrics::new()?);

    let sink: Arc<dyn AlertSink> = match &config.alert_webhook_url {
        Some(url) => {
            info!(url = %url, "Delivering alerts to webhook");
            Arc::new(WebhookAlertSink::new(url.clone())?)
        }
        None => {
            warn!("ALERT_WEBHOOK_URL not set - alerts will only be logged");
            Arc::new(LoggingAlertSink)
        }
    };
    let (dispatcher, dispatcher_task) =
        AlertDispatcher::new(sink, Arc::new(LoggingConfirmationLog), config.timeframe.clone())
            .with_metrics(metrics.clone())
            .spawn(config.alert_queue_capacity);

    let registry = SymbolRegistry::new(
        config.feed.symbols.iter().cloned(),
        config.window_size,
        config.max_entries,
    );
    let evaluator = SignalEvaluator::new(config.session, config.adx_threshold);
    let pipeline = SignalPipeline::new(registry, evaluator)
        .with_dispatcher(dispatcher.clone())
        .with_metrics(metrics.clone());

    let (tick_tx, tick_rx) = mpsc::channel(TICK_CHANNEL_CAPACITY);
    let pipeline_task = tokio::spawn(pipeline.run(tick_rx));

    if let Some(port) = config.http_port {
        let state = AppState::new(metrics.clone()).with_dispatcher(dispatcher.clone());
        tokio::spawn(async move {
            if let Err(e) = start_server(port, state).await {
                error!(error = %e, "HTTP server failed");
            }
        });
    } else {
        info!("PORT=0 - health and metrics endpoints disabled");
    }

    let client = FeedClient::new(config.feed.clone()).with_metrics(metrics.clone());
    let mut feed = FeedService::start(client, tick_tx);

    info!("Signal engine running. Waiting for shutdown signal...");
    signal::ctrl_c().await?;

    info!("Shutting down signal engine...");
    feed.stop().await;

    // The feed owned the only tick sender, so the pipeline drains and exits.
    if let Err(e) = pipeline_task.await {
        warn!(error = %e, "Pipeline task ended abnormally");
    }
    drop(dispatcher);
    // The HTTP server may still hold a dispatcher handle; don't wait on it.
    dispatcher_task.abort();

    info!("Signal engine stopped");
    Ok(())
}

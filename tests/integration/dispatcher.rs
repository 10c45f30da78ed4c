//! Integration tests for the alert dispatcher

use crate::test_utils::{shared, FailingSink, GatedSink, RecordingLog, RecordingSink, WAIT};
use goldenbullx::metrics::Metrics;
use goldenbullx::models::{Alert, Confirmation, Side};
use goldenbullx::services::dispatch::{AlertDispatcher, LoggingConfirmationLog};
use std::sync::Arc;

fn alert(symbol: &str, confidence: f64) -> Alert {
    Alert {
        symbol: symbol.to_string(),
        confidence,
        entry: 1,
        indicators: None,
    }
}

#[tokio::test]
async fn alerts_are_delivered_in_order() {
    let sink = shared(RecordingSink::default());
    let (handle, task) = AlertDispatcher::new(sink.clone(), shared(LoggingConfirmationLog), "3m").spawn(8);

    assert!(handle.submit(alert("BTCUSDT", 88.0)));
    assert!(handle.submit(alert("ETHUSDT", 91.5)));

    let messages = sink.wait_for(2).await;
    assert_eq!(messages[0].symbol, "BTCUSDT");
    assert_eq!(messages[1].symbol, "ETHUSDT");
    assert_eq!(messages[1].action.callback_data, "confirm_long_91.50_ETHUSDT");

    drop(handle);
    tokio::time::timeout(WAIT, task).await.unwrap().unwrap();
}

#[tokio::test]
async fn full_queue_drops_instead_of_blocking() {
    let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
    let sink = shared(GatedSink::new());
    let (handle, _task) = AlertDispatcher::new(sink.clone(), shared(LoggingConfirmationLog), "3m")
        .with_metrics(metrics.clone())
        .spawn(1);

    assert!(handle.submit(alert("BTCUSDT", 88.0)));
    // first alert is now parked inside the sink
    tokio::time::timeout(WAIT, sink.started.notified()).await.unwrap();

    assert!(handle.submit(alert("BTCUSDT", 89.0)));
    assert!(!handle.submit(alert("BTCUSDT", 90.0)));
    assert_eq!(metrics.alerts_dropped_total.get(), 1);

    sink.gate.add_permits(2);
}

#[tokio::test]
async fn failed_delivery_is_counted_and_skipped() {
    let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
    let (handle, task) = AlertDispatcher::new(shared(FailingSink(503)), shared(LoggingConfirmationLog), "3m")
        .with_metrics(metrics.clone())
        .spawn(4);

    assert!(handle.submit(alert("BTCUSDT", 88.0)));
    assert!(handle.submit(alert("BTCUSDT", 89.0)));
    drop(handle);

    // the task drains the queue before exiting
    tokio::time::timeout(WAIT, task).await.unwrap().unwrap();
    assert_eq!(metrics.alerts_dropped_total.get(), 2);
}

#[tokio::test]
async fn confirmations_reach_the_log() {
    let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
    let log = shared(RecordingLog::default());
    let (handle, _task) = AlertDispatcher::new(shared(RecordingSink::default()), log.clone(), "3m")
        .with_metrics(metrics.clone())
        .spawn(4);

    assert!(handle.confirm(Confirmation::new("BTCUSDT", 90.0, "trader-1")));

    let confirmations = log.wait_for(1).await;
    assert_eq!(confirmations[0].actor, "trader-1");
    assert_eq!(confirmations[0].side, Side::Long);
    assert_eq!(confirmations[0].confidence, 90.0);
}

#[tokio::test]
async fn submit_after_shutdown_reports_drop() {
    let (handle, task) =
        AlertDispatcher::new(shared(RecordingSink::default()), shared(LoggingConfirmationLog), "3m").spawn(4);
    task.abort();
    let _ = task.await;

    assert!(!handle.submit(alert("BTCUSDT", 88.0)));
}

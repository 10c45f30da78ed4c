//! Integration tests for the market stream client
//!
//! Each test runs a throwaway websocket server on localhost that speaks the
//! kline protocol well enough to drive the client.

use crate::test_utils::{kline_frame, priming_bars, shared, RecordingSink, WAIT};
use futures_util::{SinkExt, StreamExt};
use goldenbullx::engine::{SignalPipeline, SymbolRegistry};
use goldenbullx::metrics::Metrics;
use goldenbullx::models::Candle;
use goldenbullx::services::dispatch::{AlertDispatcher, LoggingConfirmationLog};
use goldenbullx::services::feed::messages::PING_FRAME;
use goldenbullx::services::feed::{FeedClient, FeedConfig, FeedService};
use goldenbullx::signals::{FixedConfidence, SignalEvaluator};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

type ServerSocket = WebSocketStream<TcpStream>;

async fn listen() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    (listener, url)
}

async fn accept(listener: &TcpListener) -> ServerSocket {
    let (stream, _) = tokio::time::timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    accept_async(stream).await.unwrap()
}

async fn next_text(ws: &mut ServerSocket) -> String {
    loop {
        let frame = tokio::time::timeout(WAIT, ws.next())
            .await
            .expect("client went quiet")
            .expect("client disconnected")
            .unwrap();
        if let Message::Text(text) = frame {
            return text;
        }
    }
}

fn config(url: String, symbols: &[&str]) -> FeedConfig {
    FeedConfig {
        url,
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        reconnect_min_delay: Duration::from_millis(10),
        reconnect_max_delay: Duration::from_millis(50),
        confirmed_only: false,
        ..FeedConfig::default()
    }
}

async fn recv(ticks: &mut mpsc::Receiver<Candle>) -> Candle {
    tokio::time::timeout(WAIT, ticks.recv())
        .await
        .expect("no tick in time")
        .expect("tick channel closed")
}

#[tokio::test]
async fn subscribes_and_forwards_candles() {
    let (listener, url) = listen().await;
    let (tx, mut ticks) = mpsc::channel(16);
    let mut feed = FeedService::start(FeedClient::new(config(url, &["BTCUSDT", "ETHUSDT"])), tx);

    let mut ws = accept(&listener).await;
    let subscribe: Value = serde_json::from_str(&next_text(&mut ws).await).unwrap();
    assert_eq!(
        subscribe,
        json!({"op": "subscribe", "args": ["kline.3.BTCUSDT", "kline.3.ETHUSDT"]})
    );

    ws.send(Message::Text(r#"{"success":true,"op":"subscribe"}"#.to_string())).await.unwrap();
    ws.send(Message::Text(kline_frame("BTCUSDT", 100.5, 12, false))).await.unwrap();
    ws.send(Message::Text(kline_frame("ETHUSDT", 2000.0, 12, true))).await.unwrap();

    let first = recv(&mut ticks).await;
    assert_eq!(first.symbol(), "BTCUSDT");
    assert_eq!(first.close(), 100.5);
    assert_eq!(recv(&mut ticks).await.symbol(), "ETHUSDT");

    feed.stop().await;
    assert!(!feed.is_running());
}

#[tokio::test]
async fn malformed_frames_are_dropped() {
    let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
    let (listener, url) = listen().await;
    let (tx, mut ticks) = mpsc::channel(16);
    let client = FeedClient::new(config(url, &["BTCUSDT"])).with_metrics(metrics.clone());
    let mut feed = FeedService::start(client, tx);

    let mut ws = accept(&listener).await;
    next_text(&mut ws).await;
    ws.send(Message::Text("garbage".to_string())).await.unwrap();
    ws.send(Message::Text(
        r#"{"topic":"kline.3.BTCUSDT","data":[{"high":"1","low":"1","end":1700000000000}]}"#.to_string(),
    ))
    .await
    .unwrap();
    ws.send(Message::Text(kline_frame("BTCUSDT", 101.0, 12, false))).await.unwrap();

    assert_eq!(recv(&mut ticks).await.close(), 101.0);
    assert_eq!(metrics.feed_malformed_total.get(), 2);
    assert_eq!(metrics.feed_messages_total.get(), 3);
    assert_eq!(metrics.feed_connected.get(), 1.0);

    feed.stop().await;
    assert_eq!(metrics.feed_connected.get(), 0.0);
}

#[tokio::test]
async fn confirmed_only_skips_in_progress_candles() {
    let (listener, url) = listen().await;
    let (tx, mut ticks) = mpsc::channel(16);
    let config = FeedConfig {
        confirmed_only: true,
        ..config(url, &["BTCUSDT"])
    };
    let mut feed = FeedService::start(FeedClient::new(config), tx);

    let mut ws = accept(&listener).await;
    next_text(&mut ws).await;
    ws.send(Message::Text(kline_frame("BTCUSDT", 100.0, 12, false))).await.unwrap();
    ws.send(Message::Text(kline_frame("BTCUSDT", 100.7, 12, true))).await.unwrap();

    assert_eq!(recv(&mut ticks).await.close(), 100.7);

    feed.stop().await;
}

#[tokio::test]
async fn reconnects_and_resubscribes_after_server_close() {
    let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
    let (listener, url) = listen().await;
    let (tx, mut ticks) = mpsc::channel(16);
    let client = FeedClient::new(config(url, &["BTCUSDT"])).with_metrics(metrics.clone());
    let mut feed = FeedService::start(client, tx);

    let mut first = accept(&listener).await;
    next_text(&mut first).await;
    first.send(Message::Text(kline_frame("BTCUSDT", 100.0, 12, false))).await.unwrap();
    assert_eq!(recv(&mut ticks).await.close(), 100.0);
    first.close(None).await.unwrap();

    let mut second = accept(&listener).await;
    let subscribe: Value = serde_json::from_str(&next_text(&mut second).await).unwrap();
    assert_eq!(subscribe["args"], json!(["kline.3.BTCUSDT"]));
    second.send(Message::Text(kline_frame("BTCUSDT", 100.9, 12, false))).await.unwrap();

    assert_eq!(recv(&mut ticks).await.close(), 100.9);
    assert!(metrics.feed_reconnects_total.get() >= 1);

    feed.stop().await;
}

#[tokio::test]
async fn silent_server_triggers_heartbeat_reconnect() {
    let (listener, url) = listen().await;
    let (tx, mut ticks) = mpsc::channel(16);
    let config = FeedConfig {
        heartbeat_interval: Duration::from_millis(100),
        heartbeat_timeout: Duration::from_millis(100),
        ..config(url, &["BTCUSDT"])
    };
    let mut feed = FeedService::start(FeedClient::new(config), tx);

    // keep the first socket open but never answer the ping
    let mut silent = accept(&listener).await;
    next_text(&mut silent).await;
    assert_eq!(next_text(&mut silent).await, PING_FRAME);

    let mut second = accept(&listener).await;
    next_text(&mut second).await;
    second.send(Message::Text(kline_frame("BTCUSDT", 102.0, 12, false))).await.unwrap();
    assert_eq!(recv(&mut ticks).await.close(), 102.0);

    feed.stop().await;
    drop(silent);
}

#[tokio::test]
async fn stop_closes_the_socket() {
    let (listener, url) = listen().await;
    let (tx, _ticks) = mpsc::channel(16);
    let mut feed = FeedService::start(FeedClient::new(config(url, &["BTCUSDT"])), tx);

    let mut ws = accept(&listener).await;
    next_text(&mut ws).await;
    assert!(feed.is_running());

    feed.stop().await;
    assert!(!feed.is_running());

    let closed = tokio::time::timeout(WAIT, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(closed.is_ok());
}

#[tokio::test]
async fn stream_to_alert_end_to_end() {
    let (listener, url) = listen().await;

    let sink = shared(RecordingSink::default());
    let (dispatcher, _dispatcher_task) =
        AlertDispatcher::new(sink.clone(), shared(LoggingConfirmationLog), "3m").spawn(8);
    let pipeline = SignalPipeline::new(
        SymbolRegistry::new(["BTCUSDT"], 100, 2),
        SignalEvaluator::default().with_scorer(FixedConfidence(90.0)),
    )
    .with_dispatcher(dispatcher);

    let (tx, rx) = mpsc::channel(128);
    tokio::spawn(pipeline.run(rx));
    let mut feed = FeedService::start(FeedClient::new(config(url, &["BTCUSDT"])), tx);

    let mut ws = accept(&listener).await;
    next_text(&mut ws).await;
    for candle in priming_bars("BTCUSDT") {
        ws.send(Message::Text(kline_frame("BTCUSDT", candle.close(), 12, true)))
            .await
            .unwrap();
    }
    ws.send(Message::Text(kline_frame("BTCUSDT", 100.0, 12, true))).await.unwrap();

    let messages = sink.wait_for(1).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].symbol, "BTCUSDT");
    assert_eq!(messages[0].confidence, 90.0);
    assert!(messages[0].headline().contains("Pair: BTCUSDT"));

    feed.stop().await;
}

//! Health, metrics and confirmation endpoints using Axum

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{info, warn, Level};

use crate::metrics::Metrics;
use crate::models::Confirmation;
use crate::services::dispatch::DispatcherHandle;

pub const SERVICE_NAME: &str = "goldenbullx-signal-engine";

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub dispatcher: Option<DispatcherHandle>,
}

impl AppState {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self {
            metrics,
            start_time: Arc::new(Instant::now()),
            dispatcher: None,
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: DispatcherHandle) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let connected = state.metrics.feed_connected.get() >= 1.0;
    Json(json!({
        "status": if connected { "healthy" } else { "degraded" },
        "feed_connected": connected,
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "service": SERVICE_NAME
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Confirmation feedback from the presentation layer.
///
/// Either the explicit `{symbol, confidence}` pair or the callback data of the
/// pressed action must be present.
#[derive(Debug, Deserialize)]
pub struct ConfirmationRequest {
    pub actor: String,
    pub symbol: Option<String>,
    pub confidence: Option<f64>,
    pub callback_data: Option<String>,
}

impl ConfirmationRequest {
    fn into_confirmation(self) -> Option<Confirmation> {
        match (self.symbol, self.confidence, self.callback_data) {
            (Some(symbol), Some(confidence), _) => Some(Confirmation::new(symbol, confidence, self.actor)),
            (_, _, Some(data)) => Confirmation::from_callback(&data, self.actor),
            _ => None,
        }
    }
}

async fn submit_confirmation(
    State(state): State<AppState>,
    Json(request): Json<ConfirmationRequest>,
) -> Result<StatusCode, StatusCode> {
    let dispatcher = state
        .dispatcher
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    let confirmation = request.into_confirmation().ok_or_else(|| {
        warn!("Confirmation without symbol/confidence or callback data");
        StatusCode::UNPROCESSABLE_ENTITY
    })?;

    if dispatcher.confirm(confirmation) {
        Ok(StatusCode::ACCEPTED)
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/confirmations", post(submit_confirmation))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .with_state(state)
}

pub async fn start_server(port: u16, state: AppState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}

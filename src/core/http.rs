//! HTTP endpoint server using Axum
//!
//! Exposes the paper account over the same single-writer path the poller
//! uses: `/check` runs one real cycle, `/state` reads the latest completed
//! one. Indicator or data-source failures are reported inside the payload,
//! never as 5xx.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::config::Config;
use crate::core::runtime::EvaluationRuntime;
use crate::metrics::Metrics;
use crate::models::account::AccountState;
use crate::models::signal::EvaluationReport;
use crate::trading::ledger::SizingPolicy;

#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<EvaluationRuntime>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub config: Arc<Config>,
}

/// Service banner: symbol, cadence, and the paper sizing settings.
async fn root(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    let paper = match config.sizing_policy {
        SizingPolicy::Ladder {
            base_size,
            step_size,
        } => json!({
            "sizing_policy": "ladder",
            "start_balance": config.start_balance,
            "base_size": base_size,
            "step_size": step_size,
        }),
        SizingPolicy::FixedCapital {
            base_usd,
            step_usd,
            max_capital,
        } => json!({
            "sizing_policy": "fixed_capital",
            "start_balance": config.start_balance,
            "base_usd": base_usd,
            "step_usd": step_usd,
            "max_capital": max_capital,
            "dca_step_pct": config.dca_step_pct,
        }),
    };

    Json(json!({
        "status": "ok",
        "symbol": config.symbol,
        "interval_min": config.interval_min,
        "k_strong": config.k_strong,
        "signal_policy": config.signal_policy.name(),
        "paper": paper,
    }))
}

/// Account state after the most recent completed cycle. Read-only.
async fn current_state(State(state): State<AppState>) -> Json<AccountState> {
    Json(state.runtime.current_state().await)
}

/// Manual evaluation: runs exactly one cycle through the single-writer path
/// and returns the resulting snapshot.
async fn check(State(state): State<AppState>) -> Json<EvaluationReport> {
    Json(state.runtime.evaluate_once().await)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "service": "elderix",
    }))
}

async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(start.elapsed().as_secs_f64());

    response
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/state", get(current_state))
        .route("/check", get(check))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}

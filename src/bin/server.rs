//! Elderix server
//!
//! Runs the evaluation poller and the HTTP API in one process. The poller
//! and the `/check` endpoint share a single-writer runtime, so manual and
//! periodic evaluation can never race.

use dotenvy::dotenv;
use elderix::config::{get_environment, Config};
use elderix::core::http::{start_server, AppState};
use elderix::core::runtime::EvaluationRuntime;
use elderix::core::scheduler::EvaluationScheduler;
use elderix::logging;
use elderix::metrics::Metrics;
use elderix::services::binance::BinanceMarketDataProvider;
use elderix::services::market_data::MarketDataProvider;
use elderix::trading::engine::PaperTradingEngine;
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    // Initialize logging based on environment
    logging::init_logging();

    // Invalid configuration is fatal before the first cycle
    let config = Config::from_env()?;

    info!("Starting Elderix server");
    info!(environment = %get_environment(), "Environment");
    info!(
        symbol = %config.symbol,
        interval = %config.interval(),
        signal_policy = config.signal_policy.name(),
        sizing_policy = config.sizing_policy.name(),
        poll_sec = config.poll_sec,
        "Evaluating {} every {}s on {} bars",
        config.symbol,
        config.poll_sec,
        config.interval()
    );

    let metrics = Arc::new(Metrics::new()?);
    let provider: Arc<dyn MarketDataProvider> = Arc::new(BinanceMarketDataProvider::new(
        &config.binance_base_url,
        config.fetch_timeout(),
    )?);
    let engine = PaperTradingEngine::from_config(&config);
    let runtime = Arc::new(EvaluationRuntime::new(
        provider,
        engine,
        &config,
        Some(metrics.clone()),
    ));

    let scheduler = EvaluationScheduler::new(runtime.clone(), config.poll_interval())?;
    scheduler.start().await;

    let port = config.port;
    let state = AppState {
        runtime,
        metrics,
        start_time: Arc::new(Instant::now()),
        config: Arc::new(config),
    };
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("Server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down...");
            scheduler.stop().await;
            info!("Server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}

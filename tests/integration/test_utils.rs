//! Shared utilities for integration tests

use axum_test::TestServer;
use elderix::config::Config;
use elderix::core::http::{create_router, AppState};
use elderix::core::runtime::EvaluationRuntime;
use elderix::metrics::Metrics;
use elderix::services::binance::BinanceMarketDataProvider;
use elderix::services::market_data::MarketDataProvider;
use elderix::trading::engine::PaperTradingEngine;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Binance-style kline rows: `[open_time, "o", "h", "l", "c", "v", ...]`,
/// one minute apart, prices as strings.
pub fn klines_json(bars: &[(f64, f64, f64, f64)]) -> Value {
    let rows: Vec<Value> = bars
        .iter()
        .enumerate()
        .map(|(i, (open, high, low, close))| {
            let open_time = 1_700_000_000_000_i64 + i as i64 * 60_000;
            json!([
                open_time,
                format!("{open}"),
                format!("{high}"),
                format!("{low}"),
                format!("{close}"),
                "0",
                open_time + 59_999,
                "0",
                0,
                "0",
                "0",
                "0"
            ])
        })
        .collect();
    json!(rows)
}

/// 39 quiet bars around 100 (5-point range), then one bull-power spike that
/// the strong-threshold policy classifies as a long.
pub fn bullish_bars() -> Vec<(f64, f64, f64, f64)> {
    let mut bars = vec![(100.0, 102.5, 97.5, 100.0); 39];
    bars.push((100.0, 110.0, 99.0, 100.0));
    bars
}

/// Uniform quiet bars: no strong flag on either side.
#[allow(dead_code)]
pub fn quiet_bars() -> Vec<(f64, f64, f64, f64)> {
    vec![(100.0, 102.5, 97.5, 100.0); 40]
}

/// Test harness: router plus runtime wired to a fake klines API.
#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub market: MockServer,
    pub runtime: Arc<EvaluationRuntime>,
    pub metrics: Arc<Metrics>,
}

impl TestApp {
    /// Serve the given bars from the fake market for every fetch.
    pub async fn new(bars: &[(f64, f64, f64, f64)]) -> Self {
        let market = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/klines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(klines_json(bars)))
            .mount(&market)
            .await;
        Self::with_market(market).await
    }

    /// Wire the app against an already-configured mock market.
    pub async fn with_market(market: MockServer) -> Self {
        let mut config = Config::default();
        config.binance_base_url = market.uri();

        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let provider: Arc<dyn MarketDataProvider> = Arc::new(
            BinanceMarketDataProvider::new(&config.binance_base_url, Duration::from_secs(2))
                .expect("provider initialization"),
        );
        let engine = PaperTradingEngine::from_config(&config);
        let runtime = Arc::new(EvaluationRuntime::new(
            provider,
            engine,
            &config,
            Some(metrics.clone()),
        ));

        let state = AppState {
            runtime: runtime.clone(),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            config: Arc::new(config),
        };
        let server = TestServer::new(create_router(state)).expect("start test server");

        Self {
            server,
            market,
            runtime,
            metrics,
        }
    }
}

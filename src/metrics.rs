//! Prometheus metrics registry

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub evaluations_total: IntCounter,
    pub evaluation_failures_total: IntCounter,
    pub signals_total: IntCounter,
    pub account_equity: Gauge,
    pub account_flips: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounter::with_opts(Opts::new(
            "http_requests_total",
            "Total HTTP requests received",
        ))?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight = IntGauge::with_opts(Opts::new(
            "http_requests_in_flight",
            "HTTP requests currently being served",
        ))?;
        let evaluations_total = IntCounter::with_opts(Opts::new(
            "evaluations_total",
            "Evaluation cycles run",
        ))?;
        let evaluation_failures_total = IntCounter::with_opts(Opts::new(
            "evaluation_failures_total",
            "Evaluation cycles that degraded (insufficient data or fetch failure)",
        ))?;
        let signals_total = IntCounter::with_opts(Opts::new(
            "signals_total",
            "Non-neutral signals classified",
        ))?;
        let account_equity = Gauge::with_opts(Opts::new(
            "account_equity",
            "Paper account equity after the latest cycle",
        ))?;
        let account_flips = IntGauge::with_opts(Opts::new(
            "account_flips",
            "Position flips since startup",
        ))?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(evaluations_total.clone()))?;
        registry.register(Box::new(evaluation_failures_total.clone()))?;
        registry.register(Box::new(signals_total.clone()))?;
        registry.register(Box::new(account_equity.clone()))?;
        registry.register(Box::new(account_flips.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            evaluations_total,
            evaluation_failures_total,
            signals_total,
            account_equity,
            account_flips,
        })
    }

    /// Text exposition of every registered metric.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

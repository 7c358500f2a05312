//! Single-writer evaluation runtime
//!
//! Owns the paper trading engine behind one mutex. A full cycle — fetch,
//! compute, apply, mark equity — runs under that lock as one logical
//! transaction, so the periodic poller and on-demand `/check` requests can
//! never interleave, and state reads always observe a completed cycle.

use crate::config::Config;
use crate::metrics::Metrics;
use crate::models::account::AccountState;
use crate::models::signal::EvaluationReport;
use crate::services::market_data::MarketDataProvider;
use crate::trading::engine::PaperTradingEngine;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub struct EvaluationRuntime {
    provider: Arc<dyn MarketDataProvider>,
    engine: Mutex<PaperTradingEngine>,
    symbol: String,
    interval: String,
    fetch_limit: usize,
    metrics: Option<Arc<Metrics>>,
}

impl EvaluationRuntime {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        engine: PaperTradingEngine,
        config: &Config,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self {
            provider,
            engine: Mutex::new(engine),
            symbol: config.symbol.clone(),
            interval: config.interval(),
            fetch_limit: config.fetch_limit,
            metrics,
        }
    }

    /// Run exactly one evaluation cycle. A failed fetch degrades to an
    /// equity mark at the last known price; nothing here ever panics the
    /// caller, the outcome is always a report.
    pub async fn evaluate_once(&self) -> EvaluationReport {
        let mut engine = self.engine.lock().await;
        let report = match self
            .provider
            .get_candles(&self.symbol, &self.interval, self.fetch_limit)
            .await
        {
            Ok(candles) => engine.evaluate(&candles),
            Err(err) => {
                warn!(error = %err, "market data fetch failed, skipping cycle");
                engine.mark_degraded(err.reason())
            }
        };
        drop(engine);

        self.observe(&report);
        info!(
            ok = report.ok,
            reason = report.reason,
            signal = ?report.signal,
            price = report.price,
            equity = report.account.equity,
            cash = report.account.cash,
            flips = report.account.flip_count,
            "TICK"
        );
        report
    }

    /// Consistent snapshot of the account after the most recent completed
    /// cycle. Read-only.
    pub async fn current_state(&self) -> AccountState {
        self.engine.lock().await.account().clone()
    }

    fn observe(&self, report: &EvaluationReport) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        metrics.evaluations_total.inc();
        if !report.ok {
            metrics.evaluation_failures_total.inc();
        }
        if report.signal.is_some() {
            metrics.signals_total.inc();
        }
        metrics.account_equity.set(report.account.equity);
        metrics.account_flips.set(report.account.flip_count as i64);
    }
}

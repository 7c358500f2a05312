//! Fixed-interval evaluation loop

use crate::core::runtime::EvaluationRuntime;
use crate::error::ConfigError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Periodically drives `evaluate_once` on the runtime. The loop is infinite
/// and self-resuming: a degraded cycle is logged and the next tick proceeds
/// as usual.
pub struct EvaluationScheduler {
    runtime: Arc<EvaluationRuntime>,
    poll_interval: Duration,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl EvaluationScheduler {
    pub fn new(
        runtime: Arc<EvaluationRuntime>,
        poll_interval: Duration,
    ) -> Result<Self, ConfigError> {
        if poll_interval.is_zero() {
            return Err(ConfigError::NonPositive {
                name: "POLL_SEC",
                value: 0.0,
            });
        }
        Ok(Self {
            runtime,
            poll_interval,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the polling task. The first cycle runs immediately.
    pub async fn start(&self) {
        let runtime = self.runtime.clone();
        let poll_interval = self.poll_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let report = runtime.evaluate_once().await;
                if !report.ok {
                    debug!(reason = report.reason, "evaluation cycle degraded");
                }
            }
        });

        *self.handle.write().await = Some(handle);
        info!(
            interval_sec = self.poll_interval.as_secs(),
            "evaluation scheduler started"
        );
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("evaluation scheduler stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}

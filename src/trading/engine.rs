//! Paper trading cycle state machine
//!
//! One evaluation takes a bar history, computes the Elder-Ray snapshot,
//! classifies it, and applies the signal to the ledger. Indicator failures
//! never escape: the cycle degrades to an equity mark at the latest known
//! price and reports the reason in its snapshot.

use crate::config::Config;
use crate::error::IndicatorError;
use crate::indicators::elder::{calculate_elder_ray, ElderRayParams};
use crate::models::account::{AccountState, Side};
use crate::models::candle::Candle;
use crate::models::signal::EvaluationReport;
use crate::signals::classifier::SignalClassifier;
use crate::trading::ledger::{PositionLedger, SizingPolicy};
use chrono::Utc;
use tracing::{debug, info};

pub struct PaperTradingEngine {
    classifier: SignalClassifier,
    ledger: PositionLedger,
    elder_params: ElderRayParams,
    dca_step_pct: f64,
}

impl PaperTradingEngine {
    pub fn new(
        classifier: SignalClassifier,
        ledger: PositionLedger,
        elder_params: ElderRayParams,
        dca_step_pct: f64,
    ) -> Self {
        Self {
            classifier,
            ledger,
            elder_params,
            dca_step_pct,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let elder_params = ElderRayParams {
            ema_period: config.ema_period,
            atr_period: config.atr_period,
            k_strong: config.k_strong,
            min_bars: config.signal_policy.min_bars(config.ema_period),
            require_atr: config.signal_policy.requires_atr(),
        };
        Self::new(
            SignalClassifier::new(config.signal_policy),
            PositionLedger::new(config.sizing_policy, config.start_balance),
            elder_params,
            config.dca_step_pct,
        )
    }

    pub fn account(&self) -> &AccountState {
        self.ledger.account()
    }

    /// Run one evaluation over a bar history.
    pub fn evaluate(&mut self, candles: &[Candle]) -> EvaluationReport {
        let bar_ts = candles.last().map(|c| c.timestamp);
        self.ledger.record_tick(Utc::now(), bar_ts);

        match calculate_elder_ray(candles, &self.elder_params) {
            Ok(snapshot) => {
                let last = &candles[candles.len() - 1];
                let signal = self.classifier.classify(&snapshot).side();
                self.apply_signal(signal, last.close);

                EvaluationReport {
                    ok: true,
                    reason: None,
                    bar_ts,
                    price: Some(last.close),
                    snapshot: Some(snapshot),
                    signal,
                    account: self.ledger.account().clone(),
                }
            }
            Err(err) => self.degraded_report(candles.last().map(|c| c.close), &err),
        }
    }

    /// Degrade the cycle when no usable data arrived: mark equity at the
    /// latest known price (if any) and report the reason.
    pub fn mark_degraded(&mut self, reason: &'static str) -> EvaluationReport {
        self.ledger.record_tick(Utc::now(), None);
        let last_price = self.ledger.account().last_price;
        if let Some(price) = last_price {
            self.apply_signal(None, price);
        }
        EvaluationReport {
            ok: false,
            reason: Some(reason),
            bar_ts: self.ledger.account().last_bar_ts,
            price: self.ledger.account().last_price,
            snapshot: None,
            signal: None,
            account: self.ledger.account().clone(),
        }
    }

    fn degraded_report(
        &mut self,
        latest_close: Option<f64>,
        err: &IndicatorError,
    ) -> EvaluationReport {
        let price = latest_close.or(self.ledger.account().last_price);
        if let Some(price) = price {
            self.apply_signal(None, price);
        }
        debug!(reason = err.reason(), "indicator evaluation degraded");
        EvaluationReport {
            ok: false,
            reason: Some(err.reason()),
            bar_ts: self.ledger.account().last_bar_ts,
            price,
            snapshot: None,
            signal: None,
            account: self.ledger.account().clone(),
        }
    }

    /// Transition table over (position, signal). Every path re-marks equity.
    fn apply_signal(&mut self, signal: Option<Side>, price: f64) {
        let Some(side) = signal else {
            self.ledger.mark_equity(price);
            return;
        };

        let position_side = self.ledger.account().position.map(|p| p.side);

        // Repeated polling within the same bar must not re-trigger the open:
        // the guard compares against the last signal that produced an action,
        // not merely the last observed one.
        if self.ledger.account().last_action_signal == Some(side) && position_side == Some(side) {
            self.check_dca(price);
            self.ledger.mark_equity(price);
            return;
        }

        match position_side {
            None => {
                self.ledger.record_signal(side);
                self.ledger.open_position(side, price);
                self.ledger.record_action(side);
                info!(side = %side, price, "opened position");
            }
            Some(current) if current == side => {
                self.ledger.record_signal(side);
                self.ledger.record_action(side);
                self.check_dca(price);
            }
            Some(_) => {
                let pnl = self.ledger.flip(side, price);
                self.ledger.record_signal(side);
                self.ledger.record_action(side);
                info!(
                    side = %side,
                    price,
                    realized_pnl = pnl,
                    flips = self.ledger.account().flip_count,
                    "flipped position"
                );
            }
        }

        self.ledger.mark_equity(price);
    }

    fn check_dca(&mut self, price: f64) {
        if matches!(self.ledger.sizing(), SizingPolicy::FixedCapital { .. })
            && self.ledger.maybe_dca(price, self.dca_step_pct)
        {
            let position = self.ledger.account().position;
            info!(
                price,
                used_capital = position.map(|p| p.used_capital),
                adds = position.map(|p| p.add_count),
                "averaged into position"
            );
        }
    }
}

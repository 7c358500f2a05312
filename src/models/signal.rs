//! Signal and evaluation output models

use crate::models::account::{AccountState, Side};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of classifying one indicator snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    Long,
    Short,
    Neutral,
}

impl SignalDirection {
    /// The position side this signal asks for, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            SignalDirection::Long => Some(Side::Long),
            SignalDirection::Short => Some(Side::Short),
            SignalDirection::Neutral => None,
        }
    }
}

/// Elder-Ray indicator values for the latest bar. `atr` is absent when the
/// bar history cannot support it (or the true range collapsed to zero), in
/// which case both strong flags stay false.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElderRaySnapshot {
    pub ema: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr: Option<f64>,
    pub bull_power: f64,
    pub bear_power: f64,
    pub bull_strong: bool,
    pub bear_strong: bool,
}

/// Result of one evaluation cycle: indicator metrics plus the account
/// snapshot after the signal was applied. Failures never surface as errors
/// at the HTTP boundary; they are carried in `ok`/`reason`.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_ts: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<ElderRaySnapshot>,
    pub signal: Option<Side>,
    pub account: AccountState,
}

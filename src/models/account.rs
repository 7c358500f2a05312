//! Paper trading account state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

/// The single open position. Treated as an immutable value: open, add and
/// flip all install a new `Position` rather than mutating in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub side: Side,
    pub quantity: f64,
    pub avg_price: f64,
    pub used_capital: f64,
    pub add_count: u32,
}

/// Account bookkeeping. `cash` changes only when a position is closed;
/// `equity` is re-marked on every cycle as cash plus unrealized PnL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountState {
    pub cash: f64,
    pub equity: f64,
    pub realized_pnl: f64,
    pub flip_count: u32,
    pub last_signal: Option<Side>,
    pub last_action_signal: Option<Side>,
    pub last_close_pnl: f64,
    pub last_price: Option<f64>,
    pub last_tick_ts: Option<DateTime<Utc>>,
    pub last_bar_ts: Option<DateTime<Utc>>,
    pub position: Option<Position>,
}

impl AccountState {
    pub fn new(start_balance: f64) -> Self {
        Self {
            cash: start_balance,
            equity: start_balance,
            realized_pnl: 0.0,
            flip_count: 0,
            last_signal: None,
            last_action_signal: None,
            last_close_pnl: 0.0,
            last_price: None,
            last_tick_ts: None,
            last_bar_ts: None,
            position: None,
        }
    }
}

//! Error taxonomy for indicator evaluation, market data, and configuration.

use thiserror::Error;

/// Indicator computation failures. Non-fatal: a cycle reports them through
/// its snapshot and still marks equity when a price is known.
#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("not enough bars: have {have}, need {need}")]
    NotEnoughBars { have: usize, need: usize },

    #[error("no ATR available")]
    NotEnoughAtr,
}

impl IndicatorError {
    /// Stable reason code carried in evaluation reports.
    pub fn reason(&self) -> &'static str {
        match self {
            IndicatorError::NotEnoughBars { .. } => "not_enough_bars",
            IndicatorError::NotEnoughAtr => "not_enough_atr",
        }
    }
}

/// Failures from the market data collaborator. The cycle treats any of
/// these as "no new data" and degrades to an equity mark at the last known
/// price.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("klines request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("klines request returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed klines payload: {0}")]
    Malformed(String),
}

impl MarketDataError {
    pub fn reason(&self) -> &'static str {
        "data_source_error"
    }
}

/// Configuration problems. Fatal at startup, never raised per-cycle.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("failed to parse {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("unknown {name}: {value:?}")]
    UnknownPolicy { name: &'static str, value: String },
}

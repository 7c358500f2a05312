//! Elderix: Elder-Ray bull/bear paper trading service
//!
//! Polls OHLC bars for a single symbol, computes Bull/Bear Power over an
//! EMA baseline (optionally ATR-gated), classifies a trade signal, and
//! drives a simulated paper trading account. State is exposed over HTTP.

pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
pub mod trading;

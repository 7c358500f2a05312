//! Environment-based configuration
//!
//! Every value is read once at startup and treated as immutable for the
//! process lifetime. Invalid values are fatal before the first cycle runs.

use crate::error::ConfigError;
use crate::signals::classifier::SignalPolicy;
use crate::trading::ledger::SizingPolicy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_SYMBOL: &str = "BTCUSDT";
const DEFAULT_INTERVAL_MIN: u64 = 1;
const DEFAULT_FETCH_LIMIT: usize = 100;
const DEFAULT_EMA_PERIOD: usize = 13;
const DEFAULT_ATR_PERIOD: usize = 14;
const DEFAULT_K_STRONG: f64 = 1.5;
const DEFAULT_START_BALANCE: f64 = 1000.0;
const DEFAULT_BASE_SIZE: f64 = 500.0;
const DEFAULT_STEP_SIZE: f64 = 20.0;
const DEFAULT_BASE_USD: f64 = 100.0;
const DEFAULT_STEP_USD: f64 = 100.0;
const DEFAULT_MAX_CAPITAL: f64 = 500.0;
const DEFAULT_DCA_STEP_PCT: f64 = 0.02;
const DEFAULT_POLL_SEC: u64 = 60;
const DEFAULT_FETCH_TIMEOUT_SEC: u64 = 10;
const DEFAULT_BINANCE_BASE_URL: &str = "https://api.binance.com";
const DEFAULT_PORT: u16 = 8080;

/// Deployment environment, used to pick the log format.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub symbol: String,
    pub interval_min: u64,
    pub fetch_limit: usize,
    pub ema_period: usize,
    pub atr_period: usize,
    pub k_strong: f64,
    pub signal_policy: SignalPolicy,
    pub sizing_policy: SizingPolicy,
    pub start_balance: f64,
    pub dca_step_pct: f64,
    pub poll_sec: u64,
    pub fetch_timeout_sec: u64,
    pub binance_base_url: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            interval_min: DEFAULT_INTERVAL_MIN,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            ema_period: DEFAULT_EMA_PERIOD,
            atr_period: DEFAULT_ATR_PERIOD,
            k_strong: DEFAULT_K_STRONG,
            signal_policy: SignalPolicy::StrongThreshold,
            sizing_policy: SizingPolicy::Ladder {
                base_size: DEFAULT_BASE_SIZE,
                step_size: DEFAULT_STEP_SIZE,
            },
            start_balance: DEFAULT_START_BALANCE,
            dca_step_pct: DEFAULT_DCA_STEP_PCT,
            poll_sec: DEFAULT_POLL_SEC,
            fetch_timeout_sec: DEFAULT_FETCH_TIMEOUT_SEC,
            binance_base_url: DEFAULT_BINANCE_BASE_URL.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults,
    /// then validate. Call `dotenvy::dotenv()` beforehand to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let signal_policy = match env_string("SIGNAL_POLICY", "strong").as_str() {
            "strong" => SignalPolicy::StrongThreshold,
            "zero_cross" => SignalPolicy::ZeroCross {
                min_strength: env_optional("ZERO_CROSS_MIN_STRENGTH")?,
            },
            other => {
                return Err(ConfigError::UnknownPolicy {
                    name: "SIGNAL_POLICY",
                    value: other.to_string(),
                })
            }
        };

        let sizing_policy = match env_string("SIZING_POLICY", "ladder").as_str() {
            "ladder" => SizingPolicy::Ladder {
                base_size: env_parsed("BASE_SIZE", DEFAULT_BASE_SIZE)?,
                step_size: env_parsed("STEP_SIZE", DEFAULT_STEP_SIZE)?,
            },
            "fixed_capital" => SizingPolicy::FixedCapital {
                base_usd: env_parsed("BASE_USD", DEFAULT_BASE_USD)?,
                step_usd: env_parsed("STEP_USD", DEFAULT_STEP_USD)?,
                max_capital: env_parsed("MAX_CAPITAL", DEFAULT_MAX_CAPITAL)?,
            },
            other => {
                return Err(ConfigError::UnknownPolicy {
                    name: "SIZING_POLICY",
                    value: other.to_string(),
                })
            }
        };

        let config = Self {
            symbol: env_string("SYMBOL", DEFAULT_SYMBOL),
            interval_min: env_parsed("INTERVAL_MIN", DEFAULT_INTERVAL_MIN)?,
            fetch_limit: env_parsed("FETCH_LIMIT", DEFAULT_FETCH_LIMIT)?,
            ema_period: env_parsed("EMA_PERIOD", DEFAULT_EMA_PERIOD)?,
            atr_period: env_parsed("ATR_PERIOD", DEFAULT_ATR_PERIOD)?,
            k_strong: env_parsed("K_STRONG", DEFAULT_K_STRONG)?,
            signal_policy,
            sizing_policy,
            start_balance: env_parsed("START_BALANCE", DEFAULT_START_BALANCE)?,
            dca_step_pct: env_parsed("DCA_STEP_PCT", DEFAULT_DCA_STEP_PCT)?,
            poll_sec: env_parsed("POLL_SEC", DEFAULT_POLL_SEC)?,
            fetch_timeout_sec: env_parsed("FETCH_TIMEOUT_SEC", DEFAULT_FETCH_TIMEOUT_SEC)?,
            binance_base_url: env_string("BINANCE_BASE_URL", DEFAULT_BINANCE_BASE_URL),
            port: env_parsed("PORT", DEFAULT_PORT)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("EMA_PERIOD", self.ema_period as f64)?;
        positive("ATR_PERIOD", self.atr_period as f64)?;
        positive("K_STRONG", self.k_strong)?;
        positive("INTERVAL_MIN", self.interval_min as f64)?;
        positive("FETCH_LIMIT", self.fetch_limit as f64)?;
        positive("START_BALANCE", self.start_balance)?;
        positive("DCA_STEP_PCT", self.dca_step_pct)?;
        positive("POLL_SEC", self.poll_sec as f64)?;
        positive("FETCH_TIMEOUT_SEC", self.fetch_timeout_sec as f64)?;

        match self.sizing_policy {
            SizingPolicy::Ladder {
                base_size,
                step_size,
            } => {
                positive("BASE_SIZE", base_size)?;
                positive("STEP_SIZE", step_size)?;
            }
            SizingPolicy::FixedCapital {
                base_usd,
                step_usd,
                max_capital,
            } => {
                positive("BASE_USD", base_usd)?;
                positive("STEP_USD", step_usd)?;
                positive("MAX_CAPITAL", max_capital)?;
            }
        }

        if let SignalPolicy::ZeroCross {
            min_strength: Some(threshold),
        } = self.signal_policy
        {
            positive("ZERO_CROSS_MIN_STRENGTH", threshold)?;
        }

        Ok(())
    }

    /// Bar interval in the data source's kline notation, e.g. `1m`.
    pub fn interval(&self) -> String {
        format!("{}m", self.interval_min)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_sec)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_sec)
    }
}

fn env_string(name: &'static str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

fn env_optional<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(None),
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

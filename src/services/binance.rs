//! Binance REST klines provider

use crate::error::MarketDataError;
use crate::models::candle::Candle;
use crate::services::market_data::MarketDataProvider;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

/// Fetches klines over the public REST API. Requests carry a short timeout
/// and transient failures are retried a couple of times with exponential
/// backoff; anything else bubbles up as a `MarketDataError`.
pub struct BinanceMarketDataProvider {
    client: reqwest::Client,
    base_url: String,
}

impl BinanceMarketDataProvider {
    /// `base_url` without a trailing slash, e.g. `https://api.binance.com`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn fetch_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", interval),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MarketDataError::Status(response.status()));
        }

        let rows: Vec<Vec<serde_json::Value>> = response.json().await?;
        let mut candles = Vec::with_capacity(rows.len());
        for row in &rows {
            candles.push(parse_kline(row)?);
        }
        candles.sort_by_key(|c| c.timestamp);

        debug!(symbol, interval, count = candles.len(), "fetched klines");
        Ok(candles)
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for BinanceMarketDataProvider {
    async fn get_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        (|| self.fetch_klines(symbol, interval, limit))
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(200))
                    .with_max_times(2),
            )
            .when(|err| {
                matches!(
                    err,
                    MarketDataError::Request(_) | MarketDataError::Status(_)
                )
            })
            .await
    }
}

/// A kline row is `[open_time, open, high, low, close, volume, ...]` with
/// prices as strings.
fn parse_kline(row: &[serde_json::Value]) -> Result<Candle, MarketDataError> {
    if row.len() < 5 {
        return Err(MarketDataError::Malformed(format!(
            "kline row has {} fields, expected at least 5",
            row.len()
        )));
    }

    let open_time = row[0]
        .as_i64()
        .ok_or_else(|| MarketDataError::Malformed("kline open time is not an integer".into()))?;
    let timestamp: DateTime<Utc> = DateTime::from_timestamp_millis(open_time)
        .ok_or_else(|| MarketDataError::Malformed(format!("kline open time {open_time} out of range")))?;

    let price = |index: usize| -> Result<f64, MarketDataError> {
        let value = &row[index];
        value
            .as_str()
            .and_then(|s| s.parse().ok())
            .or_else(|| value.as_f64())
            .ok_or_else(|| MarketDataError::Malformed(format!("bad price in kline field {index}")))
    };

    Ok(Candle::new(
        timestamp,
        price(1)?,
        price(2)?,
        price(3)?,
        price(4)?,
    ))
}

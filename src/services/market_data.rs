//! Market data provider boundary

use crate::error::MarketDataError;
use crate::models::candle::Candle;

/// Source of historical bars for one symbol. Any failure is treated by the
/// evaluation cycle as "no new data this cycle".
#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Ordered candles for `symbol` at the given kline interval, oldest
    /// first, newest last, at most `limit` of them.
    async fn get_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError>;
}

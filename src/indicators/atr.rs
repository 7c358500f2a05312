//! ATR (Average True Range) indicator, Wilder smoothing

use crate::models::candle::Candle;

/// True range of a bar given the previous close.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}

/// Final Wilder ATR over the candles.
///
/// The first true range needs a previous close, so `period + 1` bars are
/// required. First ATR is the simple average of the first `period` true
/// ranges; each later value is `(prev*(period-1) + tr) / period`.
pub fn calculate_atr(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    let ranges: Vec<f64> = candles
        .windows(2)
        .map(|pair| true_range(pair[1].high, pair[1].low, pair[0].close))
        .collect();

    let mut atr = ranges[..period].iter().sum::<f64>() / period as f64;
    for &tr in &ranges[period..] {
        atr = (atr * (period as f64 - 1.0) + tr) / period as f64;
    }

    Some(atr)
}

//! EMA (Exponential Moving Average) indicator

/// Final EMA value over `closes` for the given period.
///
/// Seeded with the simple average of the first `period` closes, then
/// `ema = v*k + ema*(1-k)` with `k = 2/(period+1)` for each later close.
pub fn calculate_ema(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let mut ema = closes[..period].iter().sum::<f64>() / period as f64;
    let k = 2.0 / (period as f64 + 1.0);
    for &close in &closes[period..] {
        ema = close * k + ema * (1.0 - k);
    }

    Some(ema)
}

//! Elder-Ray Bull/Bear Power over an EMA baseline

use crate::error::IndicatorError;
use crate::indicators::atr::calculate_atr;
use crate::indicators::ema::calculate_ema;
use crate::models::candle::Candle;
use crate::models::signal::ElderRaySnapshot;

/// Parameters for one Elder-Ray computation. `min_bars` and `require_atr`
/// come from the active classification policy: the strong-threshold policy
/// needs a deeper history and a usable ATR, the zero-cross policy only the
/// EMA itself.
#[derive(Debug, Clone, Copy)]
pub struct ElderRayParams {
    pub ema_period: usize,
    pub atr_period: usize,
    pub k_strong: f64,
    pub min_bars: usize,
    pub require_atr: bool,
}

/// Compute the Elder-Ray snapshot for the latest bar.
///
/// `bull = high - ema`, `bear = low - ema`. Strong flags compare against
/// `k_strong * atr` and stay false whenever the ATR is unavailable. An ATR
/// of zero counts as unavailable; gating on it would otherwise flag every
/// bar that pokes past the EMA.
pub fn calculate_elder_ray(
    candles: &[Candle],
    params: &ElderRayParams,
) -> Result<ElderRaySnapshot, IndicatorError> {
    let need = params.min_bars.max(params.ema_period);
    if candles.len() < need {
        return Err(IndicatorError::NotEnoughBars {
            have: candles.len(),
            need,
        });
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let ema = calculate_ema(&closes, params.ema_period).ok_or(IndicatorError::NotEnoughBars {
        have: candles.len(),
        need: params.ema_period,
    })?;

    let atr = calculate_atr(candles, params.atr_period).filter(|a| *a > 0.0);
    if params.require_atr && atr.is_none() {
        return Err(IndicatorError::NotEnoughAtr);
    }

    let last = &candles[candles.len() - 1];
    let bull_power = last.high - ema;
    let bear_power = last.low - ema;
    let (bull_strong, bear_strong) = match atr {
        Some(atr) => (
            bull_power > params.k_strong * atr,
            bear_power < -(params.k_strong * atr),
        ),
        None => (false, false),
    };

    Ok(ElderRaySnapshot {
        ema,
        atr,
        bull_power,
        bear_power,
        bull_strong,
        bear_strong,
    })
}

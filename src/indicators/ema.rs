// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The very first EMA value is seeded with the SMA of the first `period` closes.
//
// Real-time blend: while today's bar is still forming, its close is replaced
// by the live quote. The seed window drops the oldest close and covers
// `period - 1` closes starting at index 1, the recurrence runs over every
// remaining close, and one final step is taken with the live price.
// =============================================================================

use super::round_to;

/// Compute the EMA series for the given `values` slice and look-back `period`.
///
/// Returns an empty `Vec` when the input is too short or the period is zero.
/// Each output element corresponds to an input starting at index `period - 1`.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `values.len() < period` => empty vec
/// - The series stops at the first non-finite value.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values.
    let sma: f64 = values[..period].iter().sum::<f64>() / period as f64;
    if !sma.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(sma);

    let mut prev_ema = sma;
    for &value in &values[period..] {
        let ema = (value - prev_ema) * multiplier + prev_ema;
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev_ema = ema;
    }

    result
}

/// Latest EMA of `closes`, optionally blended with a live quote, rounded to
/// 4 decimals.
///
/// Blending happens only when `blend_live` is set *and* `live_price` is a
/// finite, positive quote; otherwise the standard seeded EMA is returned and
/// `live_price` is ignored.
///
/// Returns `None` when `period == 0`, `closes.len() < period`, or a
/// non-finite close cut the series short of the latest bar.
pub fn ema(closes: &[f64], period: usize, live_price: Option<f64>, blend_live: bool) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let live = live_price.filter(|p| p.is_finite() && *p > 0.0);
    let value = match live {
        Some(price) if blend_live => blended(closes, period, price),
        _ => {
            let series = ema_series(closes, period);
            if series.len() != closes.len() - period + 1 {
                return None;
            }
            *series.last()?
        }
    };

    value.is_finite().then(|| round_to(value, 4))
}

/// EMA "as of now": today's live quote stands in for today's close.
///
/// Caller guarantees `period >= 1` and `closes.len() >= period`.
fn blended(closes: &[f64], period: usize, live_price: f64) -> f64 {
    let multiplier = 2.0 / (period + 1) as f64;

    // EMA(1) has multiplier 1: the result is the last observation itself.
    if period == 1 {
        return live_price;
    }

    let seed_window = &closes[1..period];
    let mut ema = seed_window.iter().sum::<f64>() / seed_window.len() as f64;
    for &close in &closes[period..] {
        ema = (close - ema) * multiplier + ema;
    }
    (live_price - ema) * multiplier + ema
}

// =============================================================================
// Commodity Channel Index (CCI)
// =============================================================================
//
//   TP   = (high + low + close) / 3
//   SMA  = mean(TP over window)
//   MAD  = mean(|TP - SMA| over window)
//   CCI  = (TP_last - SMA) / (0.015 * MAD)
//
// A flat window has MAD == 0 and no defined CCI; such points are reported as
// `None` instead of ±infinity.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::{mean, round_to};

const LAMBERT_CONSTANT: f64 = 0.015;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cci {
    /// Latest CCI, recomputed over the final window; `None` if that window is flat.
    pub value: Option<f64>,
    /// One entry per bar from index `period - 1`, `None` where the window is flat.
    pub history: Vec<Option<f64>>,
}

/// Compute CCI over aligned `highs`, `lows` and `closes`.
///
/// Returns `None` when `period == 0`, the slices differ in length, or fewer
/// than `period` bars are available.
pub fn cci(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<Cci> {
    let n = closes.len();
    if period == 0 || highs.len() != n || lows.len() != n || n < period {
        return None;
    }

    let tp: Vec<f64> = (0..n).map(|i| (highs[i] + lows[i] + closes[i]) / 3.0).collect();

    let history: Vec<Option<f64>> = tp.windows(period).map(window_cci).collect();
    let value = window_cci(&tp[n - period..]);

    Some(Cci { value, history })
}

/// CCI of the last point of `window`, rounded to 2 decimals.
fn window_cci(window: &[f64]) -> Option<f64> {
    let last = *window.last()?;
    // Summation error can leave a constant window with a tiny non-zero MAD.
    if window.iter().all(|&tp| tp == last) {
        return None;
    }

    let sma = mean(window)?;
    let deviations: Vec<f64> = window.iter().map(|tp| (tp - sma).abs()).collect();
    let mad = mean(&deviations)?;
    if !(mad > 0.0) {
        return None;
    }

    let value = (last - sma) / (LAMBERT_CONSTANT * mad);
    value.is_finite().then(|| round_to(value, 2))
}

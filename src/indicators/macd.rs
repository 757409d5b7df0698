// =============================================================================
// MACD — Moving Average Convergence / Divergence
// =============================================================================
//
//   DIF  = EMA(fast) - EMA(slow)        (seeded EMA, no live blend)
//   DEA  = EMA(signal) of DIF
//   HIST = (DIF - DEA) * 2
//
// The slow EMA series starts `slow - fast` bars after the fast one; DIF is
// formed on the slow series' indices. DEA then starts `signal - 1` DIF
// points later.
//
// History keeps only points at bars that satisfy the full `slow + signal`
// sample requirement, trimmed to the most recent `history_limit` entries.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::ema::ema_series;
use super::round_to;

/// One (DIF, DEA, histogram) triple, rounded to 4 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub dif: f64,
    pub dea: f64,
    pub hist: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    pub dif: f64,
    pub dea: f64,
    pub hist: f64,
    pub history: Vec<MacdPoint>,
}

/// Compute MACD over `closes`.
///
/// Returns `None` when:
/// - any period is zero, or `fast > slow`
/// - `closes.len() < slow + signal`
/// - a non-finite value truncated the underlying EMA series
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize, history_limit: usize) -> Option<Macd> {
    if fast == 0 || slow == 0 || signal == 0 || fast > slow {
        return None;
    }
    if closes.len() < slow + signal {
        return None;
    }

    let n = closes.len();
    let ema_fast = ema_series(closes, fast);
    let ema_slow = ema_series(closes, slow);
    if ema_fast.len() != n - fast + 1 || ema_slow.len() != n - slow + 1 {
        return None;
    }
    let offset = slow - fast;

    let dif: Vec<f64> = ema_fast
        .iter()
        .skip(offset)
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();

    let dea = ema_series(&dif, signal);
    if dea.is_empty() || dea.len() != dif.len() - signal + 1 {
        return None;
    }

    let points: Vec<MacdPoint> = dif[signal - 1..]
        .iter()
        .zip(&dea)
        .map(|(&dif, &dea)| MacdPoint {
            dif: round_to(dif, 4),
            dea: round_to(dea, 4),
            hist: round_to((dif - dea) * 2.0, 4),
        })
        .collect();

    let latest = *points.last()?;

    // points[0] sits at bar `slow + signal - 2`, one short of the minimum.
    let eligible = &points[1..];
    let start = eligible.len().saturating_sub(history_limit);

    Some(Macd {
        dif: latest.dif,
        dea: latest.dea,
        hist: latest.hist,
        history: eligible[start..].to_vec(),
    })
}

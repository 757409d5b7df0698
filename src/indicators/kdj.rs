// =============================================================================
// KDJ — Stochastic Oscillator with J line
// =============================================================================
//
// For each bar from index n-1 onwards, over the trailing n-bar window:
//   RSV = (close - lowest_low) / (highest_high - lowest_low) * 100
//         (50 when the window is flat)
//   K   = (K_prev * (m1 - 1) + RSV) / m1        K_0 = 50
//   D   = (D_prev * (m2 - 1) + K)   / m2        D_0 = 50
//   J   = 3K - 2D
//
// Only the final K, D and J are reported.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::round_to;

const SEED: f64 = 50.0;

/// Final K, D and J lines, each rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kdj {
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

/// Compute KDJ over aligned `highs`, `lows` and `closes`.
///
/// Returns `None` when:
/// - any of `n`, `m1`, `m2` is zero
/// - the three slices differ in length
/// - fewer than `n` bars are available
/// - any result is non-finite
pub fn kdj(highs: &[f64], lows: &[f64], closes: &[f64], n: usize, m1: usize, m2: usize) -> Option<Kdj> {
    let count = closes.len();
    if n == 0 || m1 == 0 || m2 == 0 || highs.len() != count || lows.len() != count || count < n {
        return None;
    }

    let (m1, m2) = (m1 as f64, m2 as f64);
    let mut k = SEED;
    let mut d = SEED;

    for i in (n - 1)..count {
        let start = i + 1 - n;
        let period_high = highs[start..=i].iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let period_low = lows[start..=i].iter().copied().fold(f64::INFINITY, f64::min);

        let rsv = if period_high == period_low {
            SEED
        } else {
            (closes[i] - period_low) / (period_high - period_low) * 100.0
        };

        k = (k * (m1 - 1.0) + rsv) / m1;
        d = (d * (m2 - 1.0) + k) / m2;
    }

    let j = 3.0 * k - 2.0 * d;
    if !(k.is_finite() && d.is_finite() && j.is_finite()) {
        return None;
    }

    Some(Kdj {
        k: round_to(k, 2),
        d: round_to(d, 2),
        j: round_to(j, 2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kdj_insufficient_data() {
        let v = [1.0; 8];
        assert!(kdj(&v, &v, &v, 9, 3, 3).is_none());
    }

    #[test]
    fn kdj_rejects_zero_params_and_mismatched_lengths() {
        let v = [1.0; 10];
        assert!(kdj(&v, &v, &v, 0, 3, 3).is_none());
        assert!(kdj(&v, &v, &v, 9, 0, 3).is_none());
        assert!(kdj(&v[..9], &v, &v, 9, 3, 3).is_none());
    }

    #[test]
    fn kdj_flat_window_stays_at_fifty() {
        let v = [10.0; 20];
        let r = kdj(&v, &v, &v, 9, 3, 3).unwrap();
        assert_eq!(r, Kdj { k: 50.0, d: 50.0, j: 50.0 });
    }

    #[test]
    fn kdj_single_step_by_hand() {
        // Exactly n bars => one update. Window high 12, low 8, close 11 => RSV 75.
        let highs = [10.0, 11.0, 12.0];
        let lows = [8.0, 9.0, 10.0];
        let closes = [9.0, 10.0, 11.0];
        let r = kdj(&highs, &lows, &closes, 3, 3, 3).unwrap();
        let k = (50.0 * 2.0 + 75.0) / 3.0;
        let d = (50.0 * 2.0 + k) / 3.0;
        assert_eq!(r.k, round_to(k, 2));
        assert_eq!(r.d, round_to(d, 2));
        assert_eq!(r.j, round_to(3.0 * k - 2.0 * d, 2));
    }

    #[test]
    fn kdj_rising_closes_at_high_push_k_above_d() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let highs = closes.clone();
        let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();
        let r = kdj(&highs, &lows, &closes, 9, 3, 3).unwrap();
        assert!(r.k > r.d);
        assert!(r.j > r.k);
        assert!(r.k <= 100.0);
    }
}

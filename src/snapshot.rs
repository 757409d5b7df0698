// =============================================================================
// Indicator Snapshot
// =============================================================================
//
// The result of one engine call. Every indicator family is typed on its own:
// a plain scalar, a K/D/J triple, or a current value with an aligned history.
// A family that could not be computed is `None`, never zero or an empty
// string.
//
// History series are aligned to the *trailing* portion of `dates`: the last
// history element belongs to the last bar.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::indicators::{Bollinger, Cci, Kdj, Macd};
use crate::types::SessionState;

/// EMA for one period: the live-blended (or plain) current value and the
/// unblended history, rounded to 4 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmaLine {
    pub period: usize,
    pub current: Option<f64>,
    pub history: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Bar dates aligned to the longest history series.
    pub dates: Vec<NaiveDate>,
    pub session: SessionState,
    /// Whether the live quote was blended into the EMA current values.
    pub blended: bool,
    pub ema: Vec<EmaLine>,
    pub rsi_period: usize,
    pub rsi: Option<f64>,
    pub kdj: Option<Kdj>,
    pub bollinger: Option<Bollinger>,
    /// Percent position of the live price inside the latest Bollinger band.
    pub price_position: Option<f64>,
    pub macd: Option<Macd>,
    pub cci: Option<Cci>,
}

impl IndicatorSnapshot {
    /// EMA line for `period`, if that period was requested.
    pub fn ema(&self, period: usize) -> Option<&EmaLine> {
        self.ema.iter().find(|line| line.period == period)
    }

    /// Length of the longest history series in the snapshot.
    pub fn longest_history(&self) -> usize {
        let ema = self.ema.iter().map(|l| l.history.len()).max().unwrap_or(0);
        let boll = self.bollinger.as_ref().map_or(0, |b| b.history.len());
        let macd = self.macd.as_ref().map_or(0, |m| m.history.len());
        let cci = self.cci.as_ref().map_or(0, |c| c.history.len());
        ema.max(boll).max(macd).max(cci)
    }

    /// True when not a single indicator could be computed.
    pub fn is_empty(&self) -> bool {
        self.ema.iter().all(|l| l.current.is_none())
            && self.rsi.is_none()
            && self.kdj.is_none()
            && self.bollinger.is_none()
            && self.macd.is_none()
            && self.cci.is_none()
    }
}

// =============================================================================
// Shared types used across the indicator engine
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading session's OHLCV bar, as supplied by the bar-series provider.
///
/// Bars are consumed read-only; the engine never stores them beyond a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub amount: f64,
}

/// Whether today's bar is still forming (eligible for real-time blending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Open,
    Closed,
}

impl SessionState {
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Closed
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

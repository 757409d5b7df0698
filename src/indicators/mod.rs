// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators reported in an
// analysis snapshot. Every public calculator returns `Option<T>` so callers
// are forced to handle insufficient-data and numerical-edge-case scenarios;
// none of them ever hands back NaN or infinity.

pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod kdj;
pub mod macd;
pub mod rsi;

pub use bollinger::{bollinger, price_position, Band, Bollinger};
pub use cci::{cci, Cci};
pub use ema::{ema, ema_series};
pub use kdj::{kdj, Kdj};
pub use macd::{macd, Macd, MacdPoint};
pub use rsi::rsi;

/// Round half away from zero to `decimals` places.
///
/// The scaled value is first snapped to 15 significant digits, so a decimal
/// tie whose binary form sits just below it still rounds up:
/// `1.005 * 100` is `100.49999999999999`, and `round_to(1.005, 2)` is `1.01`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals as i32);
    let scaled = value * scale;
    let snapped = format!("{scaled:.14e}").parse::<f64>().unwrap_or(scaled);
    snapped.round() / scale
}

/// Arithmetic mean; `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

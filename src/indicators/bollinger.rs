// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), with σ the *population* standard deviation
// of the window (divide by `period`).
//
// Besides the latest triple, one triple is produced for every window ending
// at index `period - 1` onwards so charts can draw the envelope.

use serde::{Deserialize, Serialize};

use super::round_to;

/// One (upper, middle, lower) triple, rounded to 4 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl Band {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Latest band plus the full aligned history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bollinger {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub history: Vec<Band>,
}

impl Bollinger {
    pub fn latest(&self) -> Band {
        Band {
            upper: self.upper,
            middle: self.middle,
            lower: self.lower,
        }
    }
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// Returns `None` when `period == 0`, fewer than `period` data points are
/// available, or any band is non-finite.
pub fn bollinger(closes: &[f64], period: usize, num_std: f64) -> Option<Bollinger> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let history = closes
        .windows(period)
        .map(|window| band(window, num_std))
        .collect::<Option<Vec<Band>>>()?;

    let latest = *history.last()?;
    Some(Bollinger {
        upper: latest.upper,
        middle: latest.middle,
        lower: latest.lower,
        history,
    })
}

fn band(window: &[f64], num_std: f64) -> Option<Band> {
    let period = window.len() as f64;
    let middle = window.iter().sum::<f64>() / period;
    let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period;
    let std_dev = variance.sqrt();

    let upper = middle + num_std * std_dev;
    let lower = middle - num_std * std_dev;
    if !(upper.is_finite() && lower.is_finite()) {
        return None;
    }

    Some(Band {
        upper: round_to(upper, 4),
        middle: round_to(middle, 4),
        lower: round_to(lower, 4),
    })
}

/// Where `price` sits inside the band, in percent (0 = lower, 100 = upper),
/// rounded to 2 decimals. Values outside [0, 100] mean the price broke out.
///
/// `None` when the band has no width or `price` is not a positive number.
pub fn price_position(band: &Band, price: f64) -> Option<f64> {
    let width = band.width();
    if !price.is_finite() || price <= 0.0 || !(width > 0.0) {
        return None;
    }
    Some(round_to((price - band.lower) / width * 100.0, 2))
}

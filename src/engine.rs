// =============================================================================
// Indicator Engine — one bar series in, one snapshot out
// =============================================================================
//
// The engine holds only immutable configuration. Each call:
//   1. validates the bars (non-empty, strictly ascending dates, finite OHLC)
//   2. keeps the trailing `window` bars
//   3. resolves blend = want_real_time AND session is open
//   4. runs every calculator; only EMA sees the live quote
//   5. assembles the snapshot, each family independently present or absent
//
// Identical inputs always produce identical snapshots. The wall clock only
// enters through `now` (or an already-resolved `SessionState`).
// =============================================================================

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::indicators::{self, bollinger, cci, ema, ema_series, kdj, macd, price_position, rsi};
use crate::session::MarketSessionClassifier;
use crate::snapshot::{EmaLine, IndicatorSnapshot};
use crate::types::{Bar, SessionState};

/// One symbol's input for [`IndicatorEngine::compute_many`].
#[derive(Debug, Clone)]
pub struct SymbolRequest {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub live_price: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    config: EngineConfig,
    classifier: MarketSessionClassifier,
}

impl IndicatorEngine {
    /// Build an engine, rejecting configurations the calculators cannot honour.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let classifier = MarketSessionClassifier::from_config(&config)?;
        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &MarketSessionClassifier {
        &self.classifier
    }

    /// Compute a snapshot, classifying the session from the wall-clock `now`.
    pub fn compute(
        &self,
        bars: &[Bar],
        live_price: Option<f64>,
        want_real_time: bool,
        now: DateTime<Utc>,
    ) -> Result<IndicatorSnapshot, EngineError> {
        let session = self.classifier.classify(now);
        self.compute_with_session(bars, live_price, want_real_time, session)
    }

    /// Compute a snapshot with an already-resolved session state.
    pub fn compute_with_session(
        &self,
        bars: &[Bar],
        live_price: Option<f64>,
        want_real_time: bool,
        session: SessionState,
    ) -> Result<IndicatorSnapshot, EngineError> {
        validate_bars(bars)?;

        let start = bars.len().saturating_sub(self.config.window);
        if start > 0 {
            debug!(
                supplied = bars.len(),
                window = self.config.window,
                "bar series longer than window, keeping trailing bars"
            );
        }
        let bars = &bars[start..];

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

        let live = live_price.filter(|p| p.is_finite() && *p > 0.0);
        let blend = want_real_time && session.is_open();

        debug!(
            bars = bars.len(),
            %session,
            want_real_time,
            blend,
            live = ?live,
            "computing indicator snapshot"
        );

        let ema_lines: Vec<EmaLine> = self
            .config
            .ema_periods
            .iter()
            .map(|&period| EmaLine {
                period,
                current: ema(&closes, period, live, blend),
                history: ema_series(&closes, period)
                    .into_iter()
                    .map(|v| indicators::round_to(v, 4))
                    .collect(),
            })
            .collect();

        let rsi_value = rsi(&closes, self.config.rsi_period);

        let kdj_params = &self.config.kdj;
        let kdj_value = kdj(&highs, &lows, &closes, kdj_params.n, kdj_params.m1, kdj_params.m2);

        let bands = bollinger(&closes, self.config.bollinger.period, self.config.bollinger.multiplier);
        let position = match (&bands, live) {
            (Some(b), Some(price)) => {
                let position = price_position(&b.latest(), price);
                if position.is_none() {
                    debug!(price, "zero-width Bollinger band, price position undefined");
                }
                position
            }
            _ => None,
        };

        let macd_params = &self.config.macd;
        let macd_value = macd(
            &closes,
            macd_params.fast,
            macd_params.slow,
            macd_params.signal,
            macd_params.history_limit,
        );

        let cci_value = cci(&highs, &lows, &closes, self.config.cci_period);
        if matches!(&cci_value, Some(c) if c.value.is_none()) {
            debug!(period = self.config.cci_period, "flat CCI window, value undefined");
        }

        let mut snapshot = IndicatorSnapshot {
            dates: Vec::new(),
            session,
            blended: blend && live.is_some(),
            ema: ema_lines,
            rsi_period: self.config.rsi_period,
            rsi: rsi_value,
            kdj: kdj_value,
            bollinger: bands,
            price_position: position,
            macd: macd_value,
            cci: cci_value,
        };

        let aligned = snapshot.longest_history();
        snapshot.dates = bars[bars.len() - aligned..].iter().map(|b| b.date).collect();

        if snapshot.is_empty() {
            debug!(bars = bars.len(), "insufficient data for every indicator");
        }

        Ok(snapshot)
    }

    /// Compute snapshots for several symbols. Each result stands alone: one
    /// malformed series does not affect the others.
    pub fn compute_many(
        &self,
        requests: &[SymbolRequest],
        want_real_time: bool,
        now: DateTime<Utc>,
    ) -> Vec<(String, Result<IndicatorSnapshot, EngineError>)> {
        let session = self.classifier.classify(now);
        let run = |req: &SymbolRequest| {
            let result = self.compute_with_session(&req.bars, req.live_price, want_real_time, session);
            (req.symbol.clone(), result)
        };

        #[cfg(feature = "parallel")]
        let results = {
            use rayon::prelude::*;
            requests.par_iter().map(run).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let results = requests.iter().map(run).collect();

        results
    }
}

/// Reject inputs the caller controls: empty series, unordered or duplicate
/// dates, and non-finite prices.
pub fn validate_bars(bars: &[Bar]) -> Result<(), EngineError> {
    if bars.is_empty() {
        return Err(EngineError::EmptySeries);
    }

    for (index, bar) in bars.iter().enumerate() {
        let fields = [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ];
        if let Some(&(field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(EngineError::NonFinitePrice { index, field });
        }
    }

    if let Some((i, pair)) = bars.windows(2).enumerate().find(|(_, w)| w[1].date <= w[0].date) {
        return Err(EngineError::NonMonotonicDates {
            index: i + 1,
            previous: pair[0].date,
            current: pair[1].date,
        });
    }

    Ok(())
}

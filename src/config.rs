// =============================================================================
// Engine Configuration — indicator parameters and session settings
// =============================================================================
//
// Everything the engine needs to know about its environment is passed in
// through this value: whether real-time blending is wanted, which exchange
// time zone defines "today", and the look-back parameters of every indicator.
//
// Persistence uses an atomic tmp + rename pattern. All fields carry
// `#[serde(default)]` so that adding new fields never breaks loading an older
// config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EngineError;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_exchange_timezone() -> String {
    "Asia/Shanghai".to_string()
}

fn default_session_open() -> String {
    "09:30".to_string()
}

fn default_window() -> usize {
    60
}

fn default_ema_periods() -> Vec<usize> {
    vec![5, 10, 20, 30, 60]
}

fn default_rsi_period() -> usize {
    14
}

fn default_cci_period() -> usize {
    14
}

// =============================================================================
// Per-indicator parameter blocks
// =============================================================================

/// Stochastic oscillator look-back and smoothing factors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdjParams {
    #[serde(default = "KdjParams::default_n")]
    pub n: usize,
    #[serde(default = "KdjParams::default_m")]
    pub m1: usize,
    #[serde(default = "KdjParams::default_m")]
    pub m2: usize,
}

impl KdjParams {
    fn default_n() -> usize {
        9
    }

    fn default_m() -> usize {
        3
    }
}

impl Default for KdjParams {
    fn default() -> Self {
        Self {
            n: Self::default_n(),
            m1: Self::default_m(),
            m2: Self::default_m(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BollingerParams {
    #[serde(default = "BollingerParams::default_period")]
    pub period: usize,

    /// Number of population standard deviations between middle and outer bands.
    #[serde(default = "BollingerParams::default_multiplier")]
    pub multiplier: f64,
}

impl BollingerParams {
    fn default_period() -> usize {
        20
    }

    fn default_multiplier() -> f64 {
        2.0
    }
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: Self::default_period(),
            multiplier: Self::default_multiplier(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacdParams {
    #[serde(default = "MacdParams::default_fast")]
    pub fast: usize,
    #[serde(default = "MacdParams::default_slow")]
    pub slow: usize,
    #[serde(default = "MacdParams::default_signal")]
    pub signal: usize,

    /// Maximum number of trailing (DIF, DEA, histogram) triples kept.
    #[serde(default = "MacdParams::default_history_limit")]
    pub history_limit: usize,
}

impl MacdParams {
    fn default_fast() -> usize {
        12
    }

    fn default_slow() -> usize {
        26
    }

    fn default_signal() -> usize {
        9
    }

    fn default_history_limit() -> usize {
        60
    }
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: Self::default_fast(),
            slow: Self::default_slow(),
            signal: Self::default_signal(),
            history_limit: Self::default_history_limit(),
        }
    }
}

// =============================================================================
// EngineConfig
// =============================================================================

/// Top-level configuration for the indicator engine.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    // --- Session ------------------------------------------------------------

    /// Default for "blend the live quote into moving averages" when the
    /// caller does not say otherwise.
    #[serde(default = "default_true")]
    pub include_real_time: bool,

    /// IANA name of the exchange time zone that defines the trading day.
    #[serde(default = "default_exchange_timezone")]
    pub exchange_timezone: String,

    /// Local `HH:MM` from which today's bar counts as open.
    #[serde(default = "default_session_open")]
    pub session_open: String,

    // --- Series -------------------------------------------------------------

    /// Only the trailing `window` bars of the input are used.
    #[serde(default = "default_window")]
    pub window: usize,

    #[serde(default = "default_ema_periods")]
    pub ema_periods: Vec<usize>,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default)]
    pub kdj: KdjParams,

    #[serde(default)]
    pub bollinger: BollingerParams,

    #[serde(default)]
    pub macd: MacdParams,

    #[serde(default = "default_cci_period")]
    pub cci_period: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            include_real_time: true,
            exchange_timezone: default_exchange_timezone(),
            session_open: default_session_open(),
            window: default_window(),
            ema_periods: default_ema_periods(),
            rsi_period: default_rsi_period(),
            kdj: KdjParams::default(),
            bollinger: BollingerParams::default(),
            macd: MacdParams::default(),
            cci_period: default_cci_period(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse engine config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("invalid engine config in {}", path.display()))?;

        info!(
            path = %path.display(),
            timezone = %config.exchange_timezone,
            window = config.window,
            include_real_time = config.include_real_time,
            "engine config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise engine config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "engine config saved (atomic)");
        Ok(())
    }

    /// Parse `exchange_timezone` into a `chrono_tz::Tz`.
    pub fn timezone(&self) -> Result<Tz, EngineError> {
        self.exchange_timezone
            .parse::<Tz>()
            .map_err(|_| EngineError::InvalidTimezone(self.exchange_timezone.clone()))
    }

    /// Parse `session_open` (`HH:MM`) into a wall-clock time.
    pub fn session_open_time(&self) -> Result<NaiveTime, EngineError> {
        NaiveTime::parse_from_str(&self.session_open, "%H:%M")
            .map_err(|_| EngineError::InvalidSessionOpen(self.session_open.clone()))
    }

    /// Reject parameter combinations the calculators cannot honour.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.timezone()?;
        self.session_open_time()?;

        positive("window", self.window)?;
        for &period in &self.ema_periods {
            positive("EMA", period)?;
        }
        positive("RSI", self.rsi_period)?;
        positive("KDJ n", self.kdj.n)?;
        positive("KDJ m1", self.kdj.m1)?;
        positive("KDJ m2", self.kdj.m2)?;
        positive("Bollinger", self.bollinger.period)?;
        positive("MACD fast", self.macd.fast)?;
        positive("MACD slow", self.macd.slow)?;
        positive("MACD signal", self.macd.signal)?;
        positive("CCI", self.cci_period)?;

        if self.macd.fast >= self.macd.slow {
            return Err(EngineError::InvalidParameter {
                name: "macd",
                reason: format!(
                    "fast period {} must be shorter than slow period {}",
                    self.macd.fast, self.macd.slow
                ),
            });
        }

        let k = self.bollinger.multiplier;
        if !k.is_finite() || k < 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "bollinger.multiplier",
                reason: format!("must be a finite non-negative number, got {k}"),
            });
        }

        Ok(())
    }
}

fn positive(indicator: &'static str, period: usize) -> Result<(), EngineError> {
    if period == 0 {
        return Err(EngineError::InvalidPeriod { indicator, period });
    }
    Ok(())
}

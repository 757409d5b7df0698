// =============================================================================
// kline-indicators — technical indicator snapshots over daily bar series
// =============================================================================
//
// Turns an ordered window of daily OHLCV bars, optionally with a live quote,
// into moving averages, oscillators and bands. Pure computation: no I/O, no
// global state, no clock reads except through the injected `now`.
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod report;
pub mod session;
pub mod snapshot;
pub mod types;

pub use config::EngineConfig;
pub use engine::{IndicatorEngine, SymbolRequest};
pub use error::EngineError;
pub use session::MarketSessionClassifier;
pub use snapshot::{EmaLine, IndicatorSnapshot};
pub use types::{Bar, SessionState};

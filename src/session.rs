// =============================================================================
// Market Session Classifier
// =============================================================================
//
// Decides whether today's bar should be treated as still forming. The only
// consumer is the real-time EMA blend, so the rule is deliberately coarse:
//
//   Saturday / Sunday          => Closed
//   weekday, local < open time => Closed
//   weekday, local >= open     => Open (until midnight, recess included)
//
// Exchange holidays on weekdays are not known here and classify as Open.
// =============================================================================

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::types::SessionState;

#[derive(Debug, Clone, Copy)]
pub struct MarketSessionClassifier {
    tz: Tz,
    open_at: NaiveTime,
}

impl MarketSessionClassifier {
    pub fn new(tz: Tz, open_at: NaiveTime) -> Self {
        Self { tz, open_at }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        Ok(Self::new(config.timezone()?, config.session_open_time()?))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Classify the wall-clock instant `now` in the exchange time zone.
    pub fn classify(&self, now: DateTime<Utc>) -> SessionState {
        let local = now.with_timezone(&self.tz);

        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return SessionState::Closed;
        }

        if local.time() >= self.open_at {
            SessionState::Open
        } else {
            SessionState::Closed
        }
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.classify(now).is_open()
    }
}

impl Default for MarketSessionClassifier {
    fn default() -> Self {
        Self::new(
            chrono_tz::Asia::Shanghai,
            NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
        )
    }
}

// =============================================================================
// Engine errors
// =============================================================================
//
// Only caller-controlled, preventable input faults are errors. Insufficient
// history is not: every calculator reports it as `None`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("bar series is empty")]
    EmptySeries,

    #[error("bar dates must be strictly ascending: bar {index} ({current}) follows {previous}")]
    NonMonotonicDates {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("bar {index} has a non-finite {field}")]
    NonFinitePrice { index: usize, field: &'static str },

    #[error("{indicator} period must be positive, got {period}")]
    InvalidPeriod {
        indicator: &'static str,
        period: usize,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unknown exchange time zone: {0}")]
    InvalidTimezone(String),

    #[error("session open must be HH:MM, got {0}")]
    InvalidSessionOpen(String),
}

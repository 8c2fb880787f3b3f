//! Calendar error types.

use thiserror::Error;

/// Errors raised while building a banking calendar from configuration.
///
/// Calendar computations themselves never fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// The timezone name is not a known IANA zone.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// The cutoff hour is outside 0..=23.
    #[error("Invalid cutoff hour: {0}")]
    InvalidCutoffHour(u32),

    /// A holiday entry is not a valid `DD-MM` day.
    #[error("Invalid holiday entry: {0:?}")]
    InvalidHoliday(String),
}

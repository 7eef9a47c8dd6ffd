//! Error types for calendar assembly.
//!
//! Only configuration and upstream-availability problems are errors. Bad
//! labels and malformed windows are recovered locally and reported as
//! [`DataWarning`](crate::warning::DataWarning) values instead.

use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::UpstreamStream;

/// Result type for calendar assembly.
pub type Result<T> = std::result::Result<T, CalendarError>;

/// Errors that stop a calendar from being assembled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The requested range has its start after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// A required upstream stream carried no data anywhere in the range.
    #[error("Insufficient upstream data: {stream} has no entries between {start} and {end}")]
    InsufficientData {
        stream: UpstreamStream,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// The engine configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_message() {
        let err = CalendarError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: start 2026-03-02 is after end 2026-03-01"
        );
    }

    #[test]
    fn test_insufficient_data_names_stream() {
        let err = CalendarError::InsufficientData {
            stream: UpstreamStream::Vedic,
            start: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        };
        assert!(err.to_string().contains("vedic"));
    }
}

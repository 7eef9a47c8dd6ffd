//! Data-quality warnings collected while assembling a calendar.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::transits::labels::LabelSystem;
use crate::windows::types::WindowSource;

/// A recovered data-quality problem.
///
/// Warnings never abort the pipeline. They are logged when raised and carried
/// on the result so callers can surface them next to the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    /// Label outside the system's vocabulary; the day was read as neutral.
    UnrecognizedLabel {
        system: LabelSystem,
        day: NaiveDate,
        raw: String,
    },
    /// Second label for a day already seen; the first one was kept.
    DuplicateLabel {
        system: LabelSystem,
        day: NaiveDate,
        raw: String,
    },
    /// Window with `end <= start`; it was discarded.
    MalformedWindow {
        source: WindowSource,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
}

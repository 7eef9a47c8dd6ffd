//! Data types produced by day-level classification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::transits::labels::{LabelSystem, PersonalLabel, PtiLabel, VedicLabel};

/// One upstream label entry as supplied by a classification provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub date: NaiveDate,
    pub label: String,
}

impl LabelRecord {
    pub fn new(date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            date,
            label: label.into(),
        }
    }
}

/// Combined verdict for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Omni,
    DoubleGo,
    Good,
    Normal,
    Excluded,
}

impl Classification {
    /// All classifications, strongest first.
    pub const ALL: [Classification; 5] = [
        Classification::Omni,
        Classification::DoubleGo,
        Classification::Good,
        Classification::Normal,
        Classification::Excluded,
    ];

    /// Whether days with this verdict qualify for posting.
    pub fn is_background(self) -> bool {
        matches!(
            self,
            Classification::Omni | Classification::DoubleGo | Classification::Good
        )
    }

    /// One-line explanation shown alongside the verdict.
    pub fn description(self) -> &'static str {
        match self {
            Classification::Omni => "All 3 systems aligned, optimal for major content batching",
            Classification::DoubleGo => "PTI and Vedic aligned, strong collective momentum",
            Classification::Good => "2 systems aligned, favorable timing",
            Classification::Normal => "Mixed signals, routine activities only",
            Classification::Excluded => "PTI Worst, never a posting day",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Classification::Omni => "OMNI",
            Classification::DoubleGo => "DOUBLE_GO",
            Classification::Good => "GOOD",
            Classification::Normal => "NORMAL",
            Classification::Excluded => "EXCLUDED",
        };
        f.write_str(name)
    }
}

/// Classification result for one calendar day. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayVerdict {
    pub day: NaiveDate,
    pub pti_label: PtiLabel,
    pub vedic_label: VedicLabel,
    pub personal_label: PersonalLabel,
    pub classification: Classification,
    /// PTI and Vedic clauses both hold, whatever the final verdict.
    pub is_double_go: bool,
    /// Systems that are individually positive under the 2-of-3 rule.
    pub systems_aligned: Vec<LabelSystem>,
    pub reason: String,
}

impl DayVerdict {
    pub fn is_background(&self) -> bool {
        self.classification.is_background()
    }
}

/// Ordered set of days that qualify for posting.
///
/// Only [`BackgroundDaySet::from_verdicts`] builds one, so the set always
/// mirrors a verdict map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BackgroundDaySet {
    pub(crate) days: BTreeSet<NaiveDate>,
}

impl BackgroundDaySet {
    pub fn contains(&self, day: &NaiveDate) -> bool {
        self.days.contains(day)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// First and last background day, if any.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.days.first()?, *self.days.last()?))
    }

    pub fn to_vec(&self) -> Vec<NaiveDate> {
        self.days.iter().copied().collect()
    }

    #[cfg(test)]
    pub(crate) fn from_days(days: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            days: days.into_iter().collect(),
        }
    }
}

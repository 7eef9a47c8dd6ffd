//! Intraday window types shared by the filters and the overlap engine.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::windows::bird_tier::BirdTier;

/// Upstream system a window came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSource {
    BirdBatch,
    YogiPoint,
    PartOfFortune,
}

impl WindowSource {
    /// The two microtransit systems intersected against bird-batch windows.
    pub const MICROTRANSITS: [WindowSource; 2] =
        [WindowSource::YogiPoint, WindowSource::PartOfFortune];

    pub fn is_microtransit(self) -> bool {
        !matches!(self, WindowSource::BirdBatch)
    }
}

impl fmt::Display for WindowSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindowSource::BirdBatch => "Bird Batch",
            WindowSource::YogiPoint => "Yogi Point",
            WindowSource::PartOfFortune => "Part of Fortune",
        };
        f.write_str(name)
    }
}

/// A window exactly as an upstream provider supplied it.
///
/// `tag` is free-form provider detail: the activity combination for
/// bird-batch windows (`"Ruling/Eating"`), the planet for microtransits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl RawWindow {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            end,
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    /// `end <= start` windows carry no time and are rejected by the filters.
    pub fn is_malformed(&self) -> bool {
        self.end <= self.start
    }
}

/// A window clipped to a single calendar day in the request's offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Window {
    pub source: WindowSource,
    pub day: NaiveDate,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub tag: Option<String>,
}

impl Window {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Intersection of a bird-batch window and a microtransit window on a
/// background day. Always `end > start`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MicroBirdWindow {
    pub day: NaiveDate,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub microtransit_system: WindowSource,
    pub duration_minutes: i64,
    pub bird_tier: Option<BirdTier>,
    pub transit_tag: Option<String>,
}

impl MicroBirdWindow {
    /// Short event title, e.g. `"MicroBird: Yogi Point x Boost"`.
    pub fn title(&self) -> String {
        match self.bird_tier {
            Some(tier) => format!("MicroBird: {} x {}", self.microtransit_system, tier),
            None => format!("MicroBird: {}", self.microtransit_system),
        }
    }
}

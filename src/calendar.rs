//! Combined calendar assembly.
//!
//! [`CombinedCalendarAssembler`] validates a request, runs classification,
//! background selection, window filtering and overlap computation in that
//! order, and packages everything into one [`CombinedCalendar`] for the
//! export, feed and persistence layers.

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{CalendarError, Result};
use crate::stats::CalendarStats;
use crate::transits::classifier::{VerdictMap, classify_range, index_labels};
use crate::transits::labels::{PersonalLabel, PtiLabel, VedicLabel};
use crate::transits::types::{BackgroundDaySet, LabelRecord};
use crate::warning::DataWarning;
use crate::windows::clip::split_within;
use crate::windows::filter::{filter_bird_batch, filter_microtransits};
use crate::windows::overlap::micro_bird_windows;
use crate::windows::types::{MicroBirdWindow, RawWindow, Window, WindowSource};

/// Version of the [`CombinedCalendar`] layout.
pub const SCHEMA_VERSION: u8 = 1;

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Fails with [`CalendarError::InvalidDateRange`] when `start > end`.
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(CalendarError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Every day from `start` to `end`, inclusive.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// The six upstream streams the assembler consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamStream {
    Pti,
    Vedic,
    Personal,
    BirdBatch,
    YogiPoint,
    PartOfFortune,
}

impl UpstreamStream {
    pub const ALL: [UpstreamStream; 6] = [
        UpstreamStream::Pti,
        UpstreamStream::Vedic,
        UpstreamStream::Personal,
        UpstreamStream::BirdBatch,
        UpstreamStream::YogiPoint,
        UpstreamStream::PartOfFortune,
    ];
}

impl fmt::Display for UpstreamStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpstreamStream::Pti => "pti",
            UpstreamStream::Vedic => "vedic",
            UpstreamStream::Personal => "personal",
            UpstreamStream::BirdBatch => "bird_batch",
            UpstreamStream::YogiPoint => "yogi_point",
            UpstreamStream::PartOfFortune => "part_of_fortune",
        };
        f.write_str(name)
    }
}

/// Everything the upstream providers computed for one request.
///
/// `None` means the provider supplied nothing at all. Label streams may be
/// sparse; missing days read as neutral.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamData {
    pub pti: Option<Vec<LabelRecord>>,
    pub vedic: Option<Vec<LabelRecord>>,
    pub personal: Option<Vec<LabelRecord>>,
    pub bird_batch: Option<Vec<RawWindow>>,
    pub yogi_point: Option<Vec<RawWindow>>,
    pub part_of_fortune: Option<Vec<RawWindow>>,
}

impl UpstreamData {
    fn labels(&self, stream: UpstreamStream) -> Option<&[LabelRecord]> {
        match stream {
            UpstreamStream::Pti => self.pti.as_deref(),
            UpstreamStream::Vedic => self.vedic.as_deref(),
            UpstreamStream::Personal => self.personal.as_deref(),
            _ => None,
        }
    }

    /// Windows supplied for `source`, or an empty slice.
    pub fn windows(&self, source: WindowSource) -> &[RawWindow] {
        let windows = match source {
            WindowSource::BirdBatch => &self.bird_batch,
            WindowSource::YogiPoint => &self.yogi_point,
            WindowSource::PartOfFortune => &self.part_of_fortune,
        };
        windows.as_deref().unwrap_or_default()
    }

    /// Whether `stream` has at least one entry that falls inside `range`.
    pub fn has_data_in(&self, stream: UpstreamStream, range: &DateRange, offset: FixedOffset) -> bool {
        let source = match stream {
            UpstreamStream::Pti | UpstreamStream::Vedic | UpstreamStream::Personal => {
                return self
                    .labels(stream)
                    .is_some_and(|records| records.iter().any(|r| range.contains(r.date)));
            }
            UpstreamStream::BirdBatch => WindowSource::BirdBatch,
            UpstreamStream::YogiPoint => WindowSource::YogiPoint,
            UpstreamStream::PartOfFortune => WindowSource::PartOfFortune,
        };

        self.windows(source)
            .iter()
            .any(|window| !split_within(source, window, offset, range.start, range.end).is_empty())
    }
}

/// Parameters of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRequest {
    /// Profile or birth-data identifier the upstream data was computed for.
    pub profile_id: String,
    pub range: DateRange,
    /// Offset that defines where each calendar day starts and ends.
    pub utc_offset: FixedOffset,
}

/// One value per window system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PerSystem<T> {
    pub bird_batch: T,
    pub yogi_point: T,
    pub part_of_fortune: T,
}

impl<T> PerSystem<T> {
    pub fn get(&self, source: WindowSource) -> &T {
        match source {
            WindowSource::BirdBatch => &self.bird_batch,
            WindowSource::YogiPoint => &self.yogi_point,
            WindowSource::PartOfFortune => &self.part_of_fortune,
        }
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> PerSystem<U> {
        PerSystem {
            bird_batch: f(&self.bird_batch),
            yogi_point: f(&self.yogi_point),
            part_of_fortune: f(&self.part_of_fortune),
        }
    }
}

/// Result of one run, handed to the export and persistence layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedCalendar {
    pub schema_version: u8,
    pub profile_id: String,
    pub range: DateRange,
    pub utc_offset: String,
    pub verdicts: VerdictMap,
    pub background_days: BackgroundDaySet,
    pub micro_bird_windows: Vec<MicroBirdWindow>,
    /// Windows as supplied, ordered by start time.
    pub raw_windows: PerSystem<Vec<RawWindow>>,
    /// Windows clipped and restricted to background days.
    pub filtered_windows: PerSystem<Vec<Window>>,
    pub stats: CalendarStats,
    pub warnings: Vec<DataWarning>,
}

impl CombinedCalendar {
    /// True when no Micro Bird window survived. This is a valid outcome and
    /// should be shown as "no precision windows available".
    pub fn has_no_precision_windows(&self) -> bool {
        self.micro_bird_windows.is_empty()
    }
}

/// Runs the classification and overlap pipeline under one configuration.
#[derive(Debug, Clone, Default)]
pub struct CombinedCalendarAssembler {
    config: EngineConfig,
}

impl CombinedCalendarAssembler {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds the combined calendar for `request`.
    ///
    /// # Errors
    ///
    /// - [`CalendarError::InvalidDateRange`] when the range is inverted.
    /// - [`CalendarError::InsufficientData`] when a required stream has no
    ///   entry anywhere in the range.
    ///
    /// Zero background days or zero Micro Bird windows are not errors.
    #[tracing::instrument(
        skip(self, upstream),
        fields(
            profile_id = %request.profile_id,
            start = %request.range.start,
            end = %request.range.end
        )
    )]
    pub fn assemble(&self, request: &CalendarRequest, upstream: &UpstreamData) -> Result<CombinedCalendar> {
        let range = request.range;
        let offset = request.utc_offset;
        range.validate()?;

        for stream in &self.config.required_streams {
            if !upstream.has_data_in(*stream, &range, offset) {
                return Err(CalendarError::InsufficientData {
                    stream: *stream,
                    start: range.start,
                    end: range.end,
                });
            }
        }

        let mut warnings = Vec::new();

        let pti = index_labels::<PtiLabel>(upstream.pti.as_deref().unwrap_or_default(), &range, &mut warnings);
        let vedic = index_labels::<VedicLabel>(upstream.vedic.as_deref().unwrap_or_default(), &range, &mut warnings);
        let personal = index_labels::<PersonalLabel>(
            upstream.personal.as_deref().unwrap_or_default(),
            &range,
            &mut warnings,
        );

        let verdicts = classify_range(&self.config.classifier, &range, &pti, &vedic, &personal);
        let background = BackgroundDaySet::from_verdicts(&verdicts);

        let bird_batch = filter_bird_batch(
            upstream.windows(WindowSource::BirdBatch),
            &background,
            offset,
            self.config.max_bird_periods_per_day,
            &mut warnings,
        );
        let yogi_point = filter_microtransits(
            WindowSource::YogiPoint,
            upstream.windows(WindowSource::YogiPoint),
            &background,
            offset,
            &mut warnings,
        );
        let part_of_fortune = filter_microtransits(
            WindowSource::PartOfFortune,
            upstream.windows(WindowSource::PartOfFortune),
            &background,
            offset,
            &mut warnings,
        );

        let micro_bird = micro_bird_windows(
            &bird_batch,
            &[&yogi_point, &part_of_fortune],
            &background,
            self.config.min_overlap_minutes,
        );

        let raw_windows = PerSystem {
            bird_batch: sorted_raw(upstream.windows(WindowSource::BirdBatch)),
            yogi_point: sorted_raw(upstream.windows(WindowSource::YogiPoint)),
            part_of_fortune: sorted_raw(upstream.windows(WindowSource::PartOfFortune)),
        };
        let filtered_windows = PerSystem {
            bird_batch,
            yogi_point,
            part_of_fortune,
        };

        let stats = CalendarStats::from_parts(
            &verdicts,
            &background,
            &raw_windows,
            &filtered_windows,
            &micro_bird,
            &warnings,
        );

        info!(
            days = stats.total_days,
            background_days = stats.background_days,
            micro_bird_windows = stats.micro_bird_windows,
            warnings = warnings.len(),
            "Combined calendar assembled"
        );

        Ok(CombinedCalendar {
            schema_version: SCHEMA_VERSION,
            profile_id: request.profile_id.clone(),
            range,
            utc_offset: offset.to_string(),
            verdicts,
            background_days: background,
            micro_bird_windows: micro_bird,
            raw_windows,
            filtered_windows,
            stats,
            warnings,
        })
    }
}

/// Builds a combined calendar with the default configuration.
pub fn assemble_calendar(request: &CalendarRequest, upstream: &UpstreamData) -> Result<CombinedCalendar> {
    CombinedCalendarAssembler::default().assemble(request, upstream)
}

fn sorted_raw(windows: &[RawWindow]) -> Vec<RawWindow> {
    let mut sorted = windows.to_vec();
    sorted.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.end.cmp(&b.end))
            .then_with(|| a.tag.cmp(&b.tag))
    });
    debug!(count = sorted.len(), "Raw windows ordered");
    sorted
}

//! Output formatting and persistence for combined calendars.
//!
//! Supports pretty-printing, JSON export (plain or gzip) and CSV append of
//! Micro Bird windows.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::calendar::CombinedCalendar;
use crate::windows::bird_tier::BirdTier;
use crate::windows::types::WindowSource;

/// Logs a calendar using Rust's debug pretty-print format.
pub fn print_pretty(calendar: &CombinedCalendar) {
    debug!("{:#?}", calendar);
}

/// Logs a calendar as pretty-printed JSON.
pub fn print_json(calendar: &CombinedCalendar) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(calendar)?);
    Ok(())
}

/// Writes a calendar as JSON to `path`, gzip-compressed when `gzip` is set.
pub fn write_json(path: &str, calendar: &CombinedCalendar, gzip: bool) -> Result<()> {
    let body = serde_json::to_vec_pretty(calendar)?;
    let mut file = File::create(path).with_context(|| format!("Failed to create {path}"))?;

    if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&body)?;
        file.write_all(&encoder.finish()?)?;
    } else {
        file.write_all(&body)?;
    }

    debug!(path, gzip, bytes = body.len(), "Calendar JSON written");
    Ok(())
}

/// Flat CSV row for one Micro Bird window.
#[derive(Debug, Serialize)]
pub struct MicroBirdRecord<'a> {
    pub profile_id: &'a str,
    pub day: NaiveDate,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub microtransit_system: WindowSource,
    pub duration_minutes: i64,
    pub bird_tier: Option<BirdTier>,
    pub transit_tag: Option<&'a str>,
    pub title: String,
}

/// Appends every Micro Bird window of `calendar` as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_micro_bird_windows(path: &str, calendar: &CombinedCalendar) -> Result<usize> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending Micro Bird rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    for window in &calendar.micro_bird_windows {
        writer.serialize(MicroBirdRecord {
            profile_id: &calendar.profile_id,
            day: window.day,
            start: window.start,
            end: window.end,
            microtransit_system: window.microtransit_system,
            duration_minutes: window.duration_minutes,
            bird_tier: window.bird_tier,
            transit_tag: window.transit_tag.as_deref(),
            title: window.title(),
        })?;
    }
    writer.flush()?;

    Ok(calendar.micro_bird_windows.len())
}

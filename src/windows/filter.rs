use chrono::FixedOffset;
use tracing::{debug, warn};

use crate::transits::types::BackgroundDaySet;
use crate::warning::DataWarning;
use crate::windows::bird_tier::select_top_periods;
use crate::windows::clip::split_within;
use crate::windows::types::{RawWindow, Window, WindowSource};

/// Restricts one system's windows to background days.
///
/// Each window is split at local midnight first, then every piece is kept or
/// dropped according to its own day, so an overnight window never lends time
/// to a non-background day. Malformed windows are dropped with a warning.
/// Output is ordered by day, then start time.
pub fn filter_to_background(
    source: WindowSource,
    raw: &[RawWindow],
    background: &BackgroundDaySet,
    offset: FixedOffset,
    warnings: &mut Vec<DataWarning>,
) -> Vec<Window> {
    let mut kept = Vec::new();
    let mut dropped_pieces = 0usize;
    let span = background.span();

    for window in raw {
        if window.is_malformed() {
            warn!(source = %source, start = %window.start, end = %window.end, "Malformed window discarded");
            warnings.push(DataWarning::MalformedWindow {
                source,
                start: window.start,
                end: window.end,
            });
            continue;
        }

        let Some((first, last)) = span else {
            continue;
        };
        for piece in split_within(source, window, offset, first, last) {
            if background.contains(&piece.day) {
                kept.push(piece);
            } else {
                dropped_pieces += 1;
            }
        }
    }

    kept.sort_by(|a, b| {
        a.day
            .cmp(&b.day)
            .then_with(|| a.start.cmp(&b.start))
            .then_with(|| a.end.cmp(&b.end))
            .then_with(|| a.tag.cmp(&b.tag))
    });

    debug!(source = %source, supplied = raw.len(), kept = kept.len(), dropped_pieces, "Windows filtered to background days");
    kept
}

/// Filters one microtransit stream (Yogi Point or Part of Fortune).
pub fn filter_microtransits(
    source: WindowSource,
    raw: &[RawWindow],
    background: &BackgroundDaySet,
    offset: FixedOffset,
    warnings: &mut Vec<DataWarning>,
) -> Vec<Window> {
    filter_to_background(source, raw, background, offset, warnings)
}

/// Filters bird-batch windows, optionally keeping only the best
/// `max_per_day` tiers of each background day.
pub fn filter_bird_batch(
    raw: &[RawWindow],
    background: &BackgroundDaySet,
    offset: FixedOffset,
    max_per_day: Option<usize>,
    warnings: &mut Vec<DataWarning>,
) -> Vec<Window> {
    let kept = filter_to_background(WindowSource::BirdBatch, raw, background, offset, warnings);

    match max_per_day {
        Some(max) => select_top_periods(kept, max),
        None => kept,
    }
}

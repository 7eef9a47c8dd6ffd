//! Day attribution for intraday windows.
//!
//! A window is attributed to calendar days in the request's UTC offset. One
//! that crosses local midnight is split at every midnight it spans, so each
//! piece lies inside exactly one day and can be kept or dropped on its own.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::windows::types::{RawWindow, Window, WindowSource};

/// Local midnight that starts `day`.
pub fn day_start(day: NaiveDate, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    day.and_hms_opt(0, 0, 0)?.and_local_timezone(offset).single()
}

/// Splits `raw` into per-day pieces. Pieces have strictly positive duration;
/// a window ending exactly at midnight yields nothing for the following day.
/// Malformed windows (`end <= start`) yield nothing.
pub fn split_by_day(source: WindowSource, raw: &RawWindow, offset: FixedOffset) -> Vec<Window> {
    let start = raw.start.with_timezone(&offset);
    let end = raw.end.with_timezone(&offset);

    let mut pieces = Vec::new();
    let mut day = start.date_naive();
    let mut cursor = start;

    while cursor < end {
        let next_day = day.succ_opt();
        let piece_end = match next_day.and_then(|d| day_start(d, offset)) {
            Some(midnight) => end.min(midnight),
            None => end,
        };

        pieces.push(Window {
            source,
            day,
            start: cursor,
            end: piece_end,
            tag: raw.tag.clone(),
        });

        match next_day {
            Some(d) => {
                cursor = piece_end;
                day = d;
            }
            None => break,
        }
    }

    pieces
}

/// Like [`split_by_day`], but only for the days `first..=last`. The window is
/// clamped to that span before splitting, so the work is bounded by the span
/// rather than by the window's length.
pub fn split_within(
    source: WindowSource,
    raw: &RawWindow,
    offset: FixedOffset,
    first: NaiveDate,
    last: NaiveDate,
) -> Vec<Window> {
    let mut clamped = raw.clone();
    if let Some(lower) = day_start(first, offset) {
        clamped.start = clamped.start.max(lower);
    }
    if let Some(upper) = last.succ_opt().and_then(|d| day_start(d, offset)) {
        clamped.end = clamped.end.min(upper);
    }
    split_by_day(source, &clamped, offset)
}

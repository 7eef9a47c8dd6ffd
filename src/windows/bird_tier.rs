use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::windows::types::Window;

/// Strength of a bird-batch period, from its main/sub activity pair.
///
/// | Combination     | Tier         | Priority |
/// |-----------------|--------------|----------|
/// | Ruling/Ruling   | Double Boost | 1        |
/// | Eating/Ruling   | Boost        | 2        |
/// | Ruling/Eating   | Build        | 3        |
/// | anything else   | Unclassified | 99       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BirdTier {
    DoubleBoost,
    Boost,
    Build,
    Unclassified,
}

impl BirdTier {
    pub fn priority(self) -> u8 {
        match self {
            BirdTier::DoubleBoost => 1,
            BirdTier::Boost => 2,
            BirdTier::Build => 3,
            BirdTier::Unclassified => 99,
        }
    }

    /// Reads a tier from a window tag: either an activity combination
    /// (`"Eating/Ruling"`) or a tier name (`"Double Boost"`).
    pub fn from_tag(tag: &str) -> BirdTier {
        if let Some((main, sub)) = tag.split_once('/') {
            return match (main.trim(), sub.trim()) {
                ("Ruling", "Ruling") => BirdTier::DoubleBoost,
                ("Eating", "Ruling") => BirdTier::Boost,
                ("Ruling", "Eating") => BirdTier::Build,
                _ => BirdTier::Unclassified,
            };
        }

        match tag.trim().to_lowercase().as_str() {
            "double boost" => BirdTier::DoubleBoost,
            "boost" => BirdTier::Boost,
            "build" => BirdTier::Build,
            _ => BirdTier::Unclassified,
        }
    }

    pub fn of(window: &Window) -> Option<BirdTier> {
        window.tag.as_deref().map(BirdTier::from_tag)
    }
}

impl fmt::Display for BirdTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BirdTier::DoubleBoost => "Double Boost",
            BirdTier::Boost => "Boost",
            BirdTier::Build => "Build",
            BirdTier::Unclassified => "Unclassified",
        };
        f.write_str(name)
    }
}

/// Keeps the `max_per_day` strongest bird-batch windows of each day.
///
/// Unclassified and untagged windows are dropped. Within a day windows are
/// ranked by tier priority, then longer first, then earlier first. The result
/// is ordered by day and start time.
pub fn select_top_periods(windows: Vec<Window>, max_per_day: usize) -> Vec<Window> {
    let mut by_day: BTreeMap<NaiveDate, Vec<(BirdTier, Window)>> = BTreeMap::new();

    for window in windows {
        let tier = BirdTier::of(&window).unwrap_or(BirdTier::Unclassified);
        if tier == BirdTier::Unclassified {
            continue;
        }
        by_day.entry(window.day).or_default().push((tier, window));
    }

    let mut selected = Vec::new();
    for (_, mut ranked) in by_day {
        ranked.sort_by(|(ta, a), (tb, b)| {
            ta.priority()
                .cmp(&tb.priority())
                .then_with(|| b.duration().cmp(&a.duration()))
                .then_with(|| a.start.cmp(&b.start))
        });
        ranked.truncate(max_per_day);

        let mut day_windows: Vec<Window> = ranked.into_iter().map(|(_, w)| w).collect();
        day_windows.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));
        selected.extend(day_windows);
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::windows::types::WindowSource;
    use chrono::{DateTime, FixedOffset};

    fn window(start: &str, end: &str, tag: Option<&str>) -> Window {
        let start = DateTime::parse_from_rfc3339(start).unwrap();
        let end: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(end).unwrap();
        Window {
            source: WindowSource::BirdBatch,
            day: start.date_naive(),
            start,
            end,
            tag: tag.map(str::to_string),
        }
    }

    #[test]
    fn test_tier_from_combination() {
        assert_eq!(BirdTier::from_tag("Ruling/Ruling"), BirdTier::DoubleBoost);
        assert_eq!(BirdTier::from_tag("Eating / Ruling"), BirdTier::Boost);
        assert_eq!(BirdTier::from_tag("Ruling/Eating"), BirdTier::Build);
        assert_eq!(BirdTier::from_tag("Sleeping/Dying"), BirdTier::Unclassified);
    }

    #[test]
    fn test_tier_from_name() {
        assert_eq!(BirdTier::from_tag("Double Boost"), BirdTier::DoubleBoost);
        assert_eq!(BirdTier::from_tag("boost"), BirdTier::Boost);
        assert_eq!(BirdTier::from_tag("Walking"), BirdTier::Unclassified);
    }

    #[test]
    fn test_priority_order() {
        assert!(BirdTier::DoubleBoost.priority() < BirdTier::Boost.priority());
        assert!(BirdTier::Boost.priority() < BirdTier::Build.priority());
        assert!(BirdTier::Build.priority() < BirdTier::Unclassified.priority());
    }

    #[test]
    fn test_select_top_periods_ranks_by_tier_then_duration() {
        let windows = vec![
            window("2026-03-01T06:00:00+00:00", "2026-03-01T06:30:00+00:00", Some("Ruling/Eating")),
            window("2026-03-01T08:00:00+00:00", "2026-03-01T08:20:00+00:00", Some("Eating/Ruling")),
            window("2026-03-01T10:00:00+00:00", "2026-03-01T10:45:00+00:00", Some("Eating/Ruling")),
            window("2026-03-01T12:00:00+00:00", "2026-03-01T12:10:00+00:00", Some("Ruling/Ruling")),
            window("2026-03-01T14:00:00+00:00", "2026-03-01T16:00:00+00:00", Some("Sleeping/Dying")),
            window("2026-03-01T17:00:00+00:00", "2026-03-01T18:00:00+00:00", None),
        ];

        let top = select_top_periods(windows, 2);

        // Double Boost at 12:00 and the longer Boost at 10:00, back in time order.
        let starts: Vec<String> = top.iter().map(|w| w.start.format("%H:%M").to_string()).collect();
        assert_eq!(starts, vec!["10:00", "12:00"]);
    }

    #[test]
    fn test_select_top_periods_is_per_day() {
        let windows = vec![
            window("2026-03-01T06:00:00+00:00", "2026-03-01T07:00:00+00:00", Some("Boost")),
            window("2026-03-01T08:00:00+00:00", "2026-03-01T09:00:00+00:00", Some("Build")),
            window("2026-03-02T06:00:00+00:00", "2026-03-02T07:00:00+00:00", Some("Build")),
        ];

        let top = select_top_periods(windows, 1);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].tag.as_deref(), Some("Boost"));
        assert_eq!(top[1].day, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }
}

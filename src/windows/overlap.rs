use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

use crate::transits::types::BackgroundDaySet;
use crate::windows::bird_tier::BirdTier;
use crate::windows::types::{MicroBirdWindow, Window};

/// Intersects one bird-batch window with one microtransit window.
///
/// Returns `None` unless both lie on the same day and the overlap lasts
/// strictly longer than zero and at least `min_overlap`.
pub fn intersect(bird: &Window, transit: &Window, min_overlap: Duration) -> Option<MicroBirdWindow> {
    if bird.day != transit.day {
        return None;
    }

    let start = bird.start.max(transit.start);
    let end = bird.end.min(transit.end);
    let duration = end - start;

    if duration <= Duration::zero() || duration < min_overlap {
        return None;
    }

    Some(MicroBirdWindow {
        day: transit.day,
        start,
        end,
        microtransit_system: transit.source,
        duration_minutes: whole_minutes(duration),
        bird_tier: BirdTier::of(bird),
        transit_tag: transit.tag.clone(),
    })
}

/// Minutes in `duration`, counting a started minute as a full one.
fn whole_minutes(duration: Duration) -> i64 {
    let minutes = duration.num_minutes();
    if duration > Duration::minutes(minutes) {
        minutes + 1
    } else {
        minutes
    }
}

/// Computes every Micro Bird window.
///
/// Windows are grouped by day and each bird-batch window is paired with each
/// microtransit window of the same background day. All non-empty overlaps
/// are emitted, without deduplication. Each microtransit stream is handled
/// independently. The result is sorted by day, then start time.
pub fn micro_bird_windows(
    bird_batch: &[Window],
    microtransits: &[&[Window]],
    background: &BackgroundDaySet,
    min_overlap_minutes: i64,
) -> Vec<MicroBirdWindow> {
    // Thresholds beyond chrono's range can never be met.
    let min_overlap = Duration::try_minutes(min_overlap_minutes).unwrap_or(Duration::MAX);

    let mut birds_by_day: BTreeMap<NaiveDate, Vec<&Window>> = BTreeMap::new();
    for bird in bird_batch {
        if background.contains(&bird.day) {
            birds_by_day.entry(bird.day).or_default().push(bird);
        }
    }

    let mut found = Vec::new();
    for stream in microtransits {
        for transit in stream.iter() {
            let Some(birds) = birds_by_day.get(&transit.day) else {
                continue;
            };
            found.extend(
                birds
                    .iter()
                    .filter_map(|bird| intersect(bird, transit, min_overlap)),
            );
        }
    }

    found.sort();
    debug!(micro_bird_windows = found.len(), bird_days = birds_by_day.len(), "Overlaps computed");
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::windows::types::WindowSource;
    use chrono::{DateTime, FixedOffset};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn window(source: WindowSource, start: &str, end: &str) -> Window {
        let start = at(start);
        Window {
            source,
            day: start.date_naive(),
            start,
            end: at(end),
            tag: None,
        }
    }

    fn bird(start: &str, end: &str) -> Window {
        window(WindowSource::BirdBatch, start, end)
    }

    fn yogi(start: &str, end: &str) -> Window {
        window(WindowSource::YogiPoint, start, end)
    }

    #[test]
    fn test_scenario_partial_overlap() {
        let background = BackgroundDaySet::from_days([day(1)]);
        let birds = vec![bird("2026-03-01T09:00:00+00:00", "2026-03-01T11:00:00+00:00")];
        let yp = vec![yogi("2026-03-01T10:30:00+00:00", "2026-03-01T12:00:00+00:00")];

        let found = micro_bird_windows(&birds, &[&yp], &background, 0);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start, at("2026-03-01T10:30:00+00:00"));
        assert_eq!(found[0].end, at("2026-03-01T11:00:00+00:00"));
        assert_eq!(found[0].duration_minutes, 30);
        assert_eq!(found[0].microtransit_system, WindowSource::YogiPoint);
    }

    #[test]
    fn test_scenario_no_overlap() {
        let background = BackgroundDaySet::from_days([day(1)]);
        let birds = vec![bird("2026-03-01T09:00:00+00:00", "2026-03-01T10:00:00+00:00")];
        let yp = vec![yogi("2026-03-01T10:15:00+00:00", "2026-03-01T11:00:00+00:00")];

        assert!(micro_bird_windows(&birds, &[&yp], &background, 0).is_empty());
    }

    #[test]
    fn test_touching_windows_do_not_overlap() {
        let background = BackgroundDaySet::from_days([day(1)]);
        let birds = vec![bird("2026-03-01T09:00:00+00:00", "2026-03-01T10:00:00+00:00")];
        let yp = vec![yogi("2026-03-01T10:00:00+00:00", "2026-03-01T11:00:00+00:00")];

        assert!(micro_bird_windows(&birds, &[&yp], &background, 0).is_empty());
    }

    #[test]
    fn test_exhaustive_pairs_across_streams() {
        let background = BackgroundDaySet::from_days([day(1)]);
        let birds = vec![
            bird("2026-03-01T09:00:00+00:00", "2026-03-01T11:00:00+00:00"),
            bird("2026-03-01T13:00:00+00:00", "2026-03-01T15:00:00+00:00"),
        ];
        let yp = vec![yogi("2026-03-01T10:00:00+00:00", "2026-03-01T14:00:00+00:00")];
        let pof = vec![window(
            WindowSource::PartOfFortune,
            "2026-03-01T08:00:00+00:00",
            "2026-03-01T09:30:00+00:00",
        )];

        let found = micro_bird_windows(&birds, &[&yp, &pof], &background, 0);

        let summary: Vec<_> = found
            .iter()
            .map(|w| (w.start.format("%H:%M").to_string(), w.microtransit_system))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("09:00".to_string(), WindowSource::PartOfFortune),
                ("10:00".to_string(), WindowSource::YogiPoint),
                ("13:00".to_string(), WindowSource::YogiPoint),
            ]
        );
    }

    #[test]
    fn test_identical_overlaps_not_deduplicated() {
        let background = BackgroundDaySet::from_days([day(1)]);
        let birds = vec![bird("2026-03-01T09:00:00+00:00", "2026-03-01T11:00:00+00:00")];
        let yp = vec![yogi("2026-03-01T09:30:00+00:00", "2026-03-01T10:00:00+00:00")];
        let pof = vec![window(
            WindowSource::PartOfFortune,
            "2026-03-01T09:30:00+00:00",
            "2026-03-01T10:00:00+00:00",
        )];

        let found = micro_bird_windows(&birds, &[&yp, &pof], &background, 0);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].microtransit_system, WindowSource::YogiPoint);
        assert_eq!(found[1].microtransit_system, WindowSource::PartOfFortune);
    }

    #[test]
    fn test_different_days_never_pair() {
        let background = BackgroundDaySet::from_days([day(1), day(2)]);
        let birds = vec![bird("2026-03-01T09:00:00+00:00", "2026-03-01T11:00:00+00:00")];
        let yp = vec![yogi("2026-03-02T09:00:00+00:00", "2026-03-02T11:00:00+00:00")];

        assert!(micro_bird_windows(&birds, &[&yp], &background, 0).is_empty());
    }

    #[test]
    fn test_non_background_days_ignored() {
        let background = BackgroundDaySet::from_days([day(2)]);
        let birds = vec![bird("2026-03-01T09:00:00+00:00", "2026-03-01T11:00:00+00:00")];
        let yp = vec![yogi("2026-03-01T10:00:00+00:00", "2026-03-01T12:00:00+00:00")];

        assert!(micro_bird_windows(&birds, &[&yp], &background, 0).is_empty());
    }

    #[test]
    fn test_min_overlap_threshold() {
        let background = BackgroundDaySet::from_days([day(1)]);
        let birds = vec![bird("2026-03-01T09:00:00+00:00", "2026-03-01T11:00:00+00:00")];
        let yp = vec![yogi("2026-03-01T10:50:00+00:00", "2026-03-01T12:00:00+00:00")];

        assert_eq!(micro_bird_windows(&birds, &[&yp], &background, 10).len(), 1);
        assert!(micro_bird_windows(&birds, &[&yp], &background, 11).is_empty());
    }

    #[test]
    fn test_huge_min_overlap_emits_nothing() {
        let background = BackgroundDaySet::from_days([day(1)]);
        let birds = vec![bird("2026-03-01T09:00:00+00:00", "2026-03-01T11:00:00+00:00")];
        let yp = vec![yogi("2026-03-01T10:00:00+00:00", "2026-03-01T12:00:00+00:00")];

        assert!(micro_bird_windows(&birds, &[&yp], &background, i64::MAX).is_empty());
    }

    #[test]
    fn test_partial_minutes_round_up() {
        let background = BackgroundDaySet::from_days([day(1)]);
        let birds = vec![bird("2026-03-01T09:00:00+00:00", "2026-03-01T11:00:00+00:00")];
        let yp = vec![
            yogi("2026-03-01T10:59:30+00:00", "2026-03-01T12:00:00+00:00"),
            yogi("2026-03-01T10:29:59+00:00", "2026-03-01T12:00:00+00:00"),
        ];

        let found = micro_bird_windows(&birds, &[&yp], &background, 0);

        let minutes: Vec<_> = found.iter().map(|w| w.duration_minutes).collect();
        assert_eq!(minutes, vec![31, 1]);
    }

    #[test]
    fn test_bird_tier_carried_through() {
        let mut tagged = bird("2026-03-01T09:00:00+00:00", "2026-03-01T11:00:00+00:00");
        tagged.tag = Some("Eating/Ruling".into());
        let mut transit = yogi("2026-03-01T10:00:00+00:00", "2026-03-01T12:00:00+00:00");
        transit.tag = Some("Jupiter".into());

        let found = intersect(&tagged, &transit, Duration::zero()).unwrap();

        assert_eq!(found.bird_tier, Some(BirdTier::Boost));
        assert_eq!(found.transit_tag.as_deref(), Some("Jupiter"));
        assert_eq!(found.title(), "MicroBird: Yogi Point x Boost");
    }
}

use serde::Serialize;
use std::collections::BTreeMap;

use crate::calendar::PerSystem;
use crate::transits::classifier::VerdictMap;
use crate::transits::types::{BackgroundDaySet, Classification};
use crate::warning::DataWarning;
use crate::windows::types::{MicroBirdWindow, RawWindow, Window};

/// Summary counts for a combined calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarStats {
    pub total_days: usize,
    pub classification_counts: BTreeMap<Classification, usize>,
    pub background_days: usize,
    pub background_percent: f64,
    pub raw_windows: PerSystem<usize>,
    pub filtered_windows: PerSystem<usize>,
    pub micro_bird_windows: usize,
    pub micro_bird_minutes: i64,
    pub warnings: usize,
}

impl CalendarStats {
    pub fn from_parts(
        verdicts: &VerdictMap,
        background: &BackgroundDaySet,
        raw: &PerSystem<Vec<RawWindow>>,
        filtered: &PerSystem<Vec<Window>>,
        micro_bird: &[MicroBirdWindow],
        warnings: &[DataWarning],
    ) -> Self {
        let mut classification_counts: BTreeMap<Classification, usize> =
            Classification::ALL.into_iter().map(|c| (c, 0)).collect();
        for verdict in verdicts.values() {
            *classification_counts.entry(verdict.classification).or_default() += 1;
        }

        CalendarStats {
            total_days: verdicts.len(),
            classification_counts,
            background_days: background.len(),
            background_percent: Self::pct(background.len(), verdicts.len()),
            raw_windows: raw.map(Vec::len),
            filtered_windows: filtered.map(Vec::len),
            micro_bird_windows: micro_bird.len(),
            micro_bird_minutes: micro_bird.iter().map(|w| w.duration_minutes).sum(),
            warnings: warnings.len(),
        }
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn count(&self, classification: Classification) -> usize {
        self.classification_counts
            .get(&classification)
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::transits::classifier::classify_day;
    use crate::transits::labels::{PersonalLabel, PtiLabel, VedicLabel};
    use chrono::NaiveDate;

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(CalendarStats::pct(10, 0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(CalendarStats::pct(50, 100), 50.0);
        assert_eq!(CalendarStats::pct(1, 4), 25.0);
    }

    #[test]
    fn test_counts_every_classification() {
        let config = ClassifierConfig::default();
        let labels = [
            (PtiLabel::Go, VedicLabel::Go, PersonalLabel::Power),
            (PtiLabel::Go, VedicLabel::Go, PersonalLabel::Neutral),
            (PtiLabel::Worst, VedicLabel::Go, PersonalLabel::Power),
            (PtiLabel::Normal, VedicLabel::Neutral, PersonalLabel::Neutral),
        ];
        let verdicts: VerdictMap = labels
            .into_iter()
            .enumerate()
            .map(|(i, (p, v, s))| {
                let day = NaiveDate::from_ymd_opt(2026, 3, i as u32 + 1).unwrap();
                (day, classify_day(&config, day, p, v, s))
            })
            .collect();
        let background = BackgroundDaySet::from_verdicts(&verdicts);

        let stats = CalendarStats::from_parts(
            &verdicts,
            &background,
            &PerSystem::default(),
            &PerSystem::default(),
            &[],
            &[],
        );

        assert_eq!(stats.total_days, 4);
        assert_eq!(stats.count(Classification::Omni), 1);
        assert_eq!(stats.count(Classification::DoubleGo), 1);
        assert_eq!(stats.count(Classification::Good), 0);
        assert_eq!(stats.count(Classification::Excluded), 1);
        assert_eq!(stats.count(Classification::Normal), 1);
        assert_eq!(stats.background_days, 2);
        assert_eq!(stats.background_percent, 50.0);
        assert_eq!(stats.micro_bird_minutes, 0);
    }

    #[test]
    fn test_counts_serialize_with_named_keys() {
        let stats = CalendarStats::from_parts(
            &VerdictMap::new(),
            &BackgroundDaySet::default(),
            &PerSystem::default(),
            &PerSystem::default(),
            &[],
            &[],
        );
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["classification_counts"]["DOUBLE_GO"], 0);
        assert_eq!(json["raw_windows"]["yogi_point"], 0);
    }
}

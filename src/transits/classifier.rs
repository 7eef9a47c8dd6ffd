use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::calendar::DateRange;
use crate::config::ClassifierConfig;
use crate::transits::labels::{
    LabelSystem, PersonalLabel, PtiLabel, TransitLabel, VedicLabel, parse_label,
};
use crate::transits::types::{Classification, DayVerdict, LabelRecord};
use crate::warning::DataWarning;

/// Labels for one system, indexed by day.
pub type DayLabels<L> = BTreeMap<NaiveDate, L>;

/// Verdicts for every day of a range, in day order.
pub type VerdictMap = BTreeMap<NaiveDate, DayVerdict>;

/// Validates one upstream label stream and indexes it by day.
///
/// Records outside `range` are ignored. Unrecognized labels are stored as
/// `L::NEUTRAL` and a warning is pushed; for duplicate days the first record
/// wins.
pub fn index_labels<L: TransitLabel>(
    records: &[LabelRecord],
    range: &DateRange,
    warnings: &mut Vec<DataWarning>,
) -> DayLabels<L> {
    let mut labels = DayLabels::new();

    for record in records {
        if !range.contains(record.date) {
            debug!(system = %L::SYSTEM, day = %record.date, "Label outside range, skipped");
            continue;
        }

        if labels.contains_key(&record.date) {
            warn!(system = %L::SYSTEM, day = %record.date, raw = %record.label, "Duplicate label, keeping first");
            warnings.push(DataWarning::DuplicateLabel {
                system: L::SYSTEM,
                day: record.date,
                raw: record.label.clone(),
            });
            continue;
        }

        let label = match parse_label::<L>(&record.label) {
            Some(label) => label,
            None => {
                warn!(system = %L::SYSTEM, day = %record.date, raw = %record.label, "Unrecognized label, treating as neutral");
                warnings.push(DataWarning::UnrecognizedLabel {
                    system: L::SYSTEM,
                    day: record.date,
                    raw: record.label.clone(),
                });
                L::NEUTRAL
            }
        };

        labels.insert(record.date, label);
    }

    labels
}

/// Classifies a single day. Rules are checked in priority order and the
/// first match wins:
///
/// 1. PTI Worst: EXCLUDED, whatever the other systems say.
/// 2. PTI, Vedic and Personal aligned: OMNI.
/// 3. PTI and Vedic aligned: DOUBLE_GO.
/// 4. Two systems positive under the GOOD-rule sets: GOOD.
/// 5. Anything else: NORMAL.
pub fn classify_day(
    config: &ClassifierConfig,
    day: NaiveDate,
    pti: PtiLabel,
    vedic: VedicLabel,
    personal: PersonalLabel,
) -> DayVerdict {
    let alignment = &config.alignment;
    let is_double_go = alignment.pti_positive(pti) && alignment.vedic_positive(vedic);

    let good = &config.good_rule;
    let systems_aligned: Vec<LabelSystem> = [
        (LabelSystem::Pti, good.pti_positive(pti)),
        (LabelSystem::Vedic, good.vedic_positive(vedic)),
        (LabelSystem::Personal, good.personal_positive(personal)),
    ]
    .into_iter()
    .filter_map(|(system, positive)| positive.then_some(system))
    .collect();

    let (classification, reason) = if pti == PtiLabel::Worst {
        (
            Classification::Excluded,
            format!("PTI Worst ({pti}), excluded from background"),
        )
    } else if is_double_go && alignment.personal_positive(personal) {
        (
            Classification::Omni,
            format!("All 3 aligned: PTI ({pti}) + Vedic ({vedic}) + Personal ({personal})"),
        )
    } else if is_double_go {
        (
            Classification::DoubleGo,
            format!("PTI ({pti}) + Vedic ({vedic}) aligned"),
        )
    } else if systems_aligned.len() >= 2 {
        let parts: Vec<String> = systems_aligned
            .iter()
            .map(|system| match system {
                LabelSystem::Pti => format!("PTI ({pti})"),
                LabelSystem::Vedic => format!("Vedic ({vedic})"),
                LabelSystem::Personal => format!("Personal ({personal})"),
            })
            .collect();
        (
            Classification::Good,
            format!("2 systems aligned: {}", parts.join(" + ")),
        )
    } else {
        (
            Classification::Normal,
            format!("Mixed: PTI ({pti}) + Vedic ({vedic}) + Personal ({personal})"),
        )
    };

    DayVerdict {
        day,
        pti_label: pti,
        vedic_label: vedic,
        personal_label: personal,
        classification,
        is_double_go,
        systems_aligned,
        reason,
    }
}

/// Produces a verdict for every day in `range`. Days missing from a stream
/// use that system's neutral label.
pub fn classify_range(
    config: &ClassifierConfig,
    range: &DateRange,
    pti: &DayLabels<PtiLabel>,
    vedic: &DayLabels<VedicLabel>,
    personal: &DayLabels<PersonalLabel>,
) -> VerdictMap {
    range
        .days()
        .map(|day| {
            let verdict = classify_day(
                config,
                day,
                pti.get(&day).copied().unwrap_or(PtiLabel::NEUTRAL),
                vedic.get(&day).copied().unwrap_or(VedicLabel::NEUTRAL),
                personal.get(&day).copied().unwrap_or(PersonalLabel::NEUTRAL),
            );
            debug!(day = %day, classification = %verdict.classification, "Day classified");
            (day, verdict)
        })
        .collect()
}

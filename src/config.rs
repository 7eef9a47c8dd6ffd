//! Engine configuration.
//!
//! Defaults reproduce the standard rules. A JSON file can override any
//! subset of fields:
//! ```json
//! {
//!   "classifier": { "good_rule": { "vedic": ["GO", "MILD GO"] } },
//!   "required_streams": ["pti", "vedic", "personal"],
//!   "max_bird_periods_per_day": 6
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::calendar::UpstreamStream;
use crate::error::CalendarError;
use crate::transits::labels::{PersonalLabel, PtiLabel, TransitLabel, VedicLabel};

/// Labels that count as "positive" for each system within one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositiveSets {
    pub pti: Vec<PtiLabel>,
    pub vedic: Vec<VedicLabel>,
    pub personal: Vec<PersonalLabel>,
}

impl Default for PositiveSets {
    fn default() -> Self {
        Self {
            pti: vec![PtiLabel::Best, PtiLabel::Go],
            vedic: vec![VedicLabel::Go, VedicLabel::MildGo, VedicLabel::Build],
            personal: vec![PersonalLabel::Power, PersonalLabel::Supportive],
        }
    }
}

impl PositiveSets {
    pub fn pti_positive(&self, label: PtiLabel) -> bool {
        self.pti.contains(&label)
    }

    pub fn vedic_positive(&self, label: VedicLabel) -> bool {
        self.vedic.contains(&label)
    }

    pub fn personal_positive(&self, label: PersonalLabel) -> bool {
        self.personal.contains(&label)
    }

    fn validate(&self, rule: &str) -> Result<(), CalendarError> {
        if self.pti.contains(&PtiLabel::NEUTRAL)
            || self.vedic.contains(&VedicLabel::NEUTRAL)
            || self.personal.contains(&PersonalLabel::NEUTRAL)
        {
            return Err(CalendarError::InvalidConfig(format!(
                "{rule}: neutral labels cannot count as positive"
            )));
        }
        if self.pti.contains(&PtiLabel::Worst) {
            return Err(CalendarError::InvalidConfig(format!(
                "{rule}: PTI Worst cannot count as positive"
            )));
        }
        Ok(())
    }
}

/// Positive-label sets used by the day classifier.
///
/// `alignment` drives the OMNI and DOUBLE_GO clauses; `good_rule` drives the
/// 2-of-3 GOOD rule. They start out identical and can be tuned separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub alignment: PositiveSets,
    pub good_rule: PositiveSets,
}

/// Top-level configuration for one assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub classifier: ClassifierConfig,
    /// Streams that must carry data somewhere in the requested range.
    pub required_streams: Vec<UpstreamStream>,
    /// Keep only the N best-tier bird-batch windows per day.
    pub max_bird_periods_per_day: Option<usize>,
    /// Micro Bird windows shorter than this are dropped. Zero still requires
    /// a strictly positive overlap.
    pub min_overlap_minutes: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            required_streams: vec![
                UpstreamStream::Pti,
                UpstreamStream::Vedic,
                UpstreamStream::Personal,
                UpstreamStream::BirdBatch,
            ],
            max_bird_periods_per_day: None,
            min_overlap_minutes: 0,
        }
    }
}

/// A Micro Bird window never outlasts the day it belongs to.
pub const MAX_MIN_OVERLAP_MINUTES: i64 = 24 * 60;

impl EngineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{path}'"))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{path}'"))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would break the classification invariants.
    pub fn validate(&self) -> Result<(), CalendarError> {
        self.classifier.alignment.validate("alignment")?;
        self.classifier.good_rule.validate("good_rule")?;

        if !(0..=MAX_MIN_OVERLAP_MINUTES).contains(&self.min_overlap_minutes) {
            return Err(CalendarError::InvalidConfig(format!(
                "min_overlap_minutes must be between 0 and {MAX_MIN_OVERLAP_MINUTES}"
            )));
        }
        if self.max_bird_periods_per_day == Some(0) {
            return Err(CalendarError::InvalidConfig(
                "max_bird_periods_per_day must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

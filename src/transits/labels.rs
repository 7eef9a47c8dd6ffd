//! Closed label vocabularies for the three day-level transit systems.
//!
//! Upstream providers hand us loosely formatted strings ("PTI Best",
//! "mild_go", "Supportive"). Every string is normalized once here and mapped
//! onto a closed enum; anything that does not map is reported to the caller
//! so it can fall back to the system's neutral label.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three day-level classification systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSystem {
    Pti,
    Vedic,
    Personal,
}

impl fmt::Display for LabelSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LabelSystem::Pti => "pti",
            LabelSystem::Vedic => "vedic",
            LabelSystem::Personal => "personal",
        };
        f.write_str(name)
    }
}

/// Behaviour shared by every per-system label enum.
pub trait TransitLabel: Copy + Eq + Ord + fmt::Debug + fmt::Display {
    /// Which system this vocabulary belongs to.
    const SYSTEM: LabelSystem;

    /// Value used for absent or unrecognized data. Never positive.
    const NEUTRAL: Self;

    /// Maps an already-normalized key (see [`normalize`]) to a label.
    fn from_normalized(key: &str) -> Option<Self>;
}

/// PTI / Magi collective day quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PtiLabel {
    Best,
    Go,
    Normal,
    Slow,
    Worst,
}

impl TransitLabel for PtiLabel {
    const SYSTEM: LabelSystem = LabelSystem::Pti;
    const NEUTRAL: Self = PtiLabel::Normal;

    fn from_normalized(key: &str) -> Option<Self> {
        let key = key
            .strip_prefix("PTI ")
            .or_else(|| key.strip_prefix("MAGI "))
            .unwrap_or(key);
        match key {
            "BEST" => Some(PtiLabel::Best),
            "GO" => Some(PtiLabel::Go),
            "NORMAL" => Some(PtiLabel::Normal),
            "SLOW" => Some(PtiLabel::Slow),
            "WORST" => Some(PtiLabel::Worst),
            _ => None,
        }
    }
}

impl fmt::Display for PtiLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PtiLabel::Best => "Best",
            PtiLabel::Go => "Go",
            PtiLabel::Normal => "Normal",
            PtiLabel::Slow => "Slow",
            PtiLabel::Worst => "Worst",
        };
        f.write_str(name)
    }
}

/// Vedic PTI day quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VedicLabel {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "MILD GO")]
    MildGo,
    #[serde(rename = "BUILD")]
    Build,
    #[serde(rename = "NEUTRAL")]
    Neutral,
    #[serde(rename = "AVOID")]
    Avoid,
}

impl TransitLabel for VedicLabel {
    const SYSTEM: LabelSystem = LabelSystem::Vedic;
    const NEUTRAL: Self = VedicLabel::Neutral;

    fn from_normalized(key: &str) -> Option<Self> {
        match key {
            "GO" => Some(VedicLabel::Go),
            "MILD GO" | "MILDGO" => Some(VedicLabel::MildGo),
            "BUILD" => Some(VedicLabel::Build),
            "NEUTRAL" => Some(VedicLabel::Neutral),
            // Older feeds publish several adverse grades; all of them avoid.
            "AVOID" | "STOP" | "MEGA RED" | "MEGA STOP" | "SLOW" => Some(VedicLabel::Avoid),
            _ => None,
        }
    }
}

impl fmt::Display for VedicLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VedicLabel::Go => "GO",
            VedicLabel::MildGo => "MILD GO",
            VedicLabel::Build => "BUILD",
            VedicLabel::Neutral => "NEUTRAL",
            VedicLabel::Avoid => "AVOID",
        };
        f.write_str(name)
    }
}

/// Personal transit day quality, derived from the profile's birth data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonalLabel {
    Power,
    Supportive,
    Neutral,
    Unfavorable,
}

impl TransitLabel for PersonalLabel {
    const SYSTEM: LabelSystem = LabelSystem::Personal;
    const NEUTRAL: Self = PersonalLabel::Neutral;

    fn from_normalized(key: &str) -> Option<Self> {
        match key {
            "POWER" => Some(PersonalLabel::Power),
            "SUPPORTIVE" => Some(PersonalLabel::Supportive),
            "NEUTRAL" => Some(PersonalLabel::Neutral),
            "UNFAVORABLE" | "AVOID" => Some(PersonalLabel::Unfavorable),
            _ => None,
        }
    }
}

impl fmt::Display for PersonalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PersonalLabel::Power => "power",
            PersonalLabel::Supportive => "supportive",
            PersonalLabel::Neutral => "neutral",
            PersonalLabel::Unfavorable => "unfavorable",
        };
        f.write_str(name)
    }
}

/// Canonical matching key for a raw upstream label.
///
/// Strips punctuation, treats `-` and `_` as spaces, collapses whitespace and
/// upper-cases the result: `" pti  best! "` becomes `"PTI BEST"`.
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter_map(|c| match c {
            '-' | '_' => Some(' '),
            c if c.is_alphanumeric() || c.is_whitespace() => Some(c),
            _ => None,
        })
        .collect();

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Parses a raw label for system `L`.
///
/// Blank input is the same as absent data and yields `L::NEUTRAL`.
/// Returns `None` when the string is not part of the vocabulary.
pub fn parse_label<L: TransitLabel>(raw: &str) -> Option<L> {
    let key = normalize(raw);
    if key.is_empty() {
        return Some(L::NEUTRAL);
    }
    L::from_normalized(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" pti  best! "), "PTI BEST");
        assert_eq!(normalize("mild_go"), "MILD GO");
        assert_eq!(normalize("Mega-Red"), "MEGA RED");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_pti_prefixes() {
        assert_eq!(parse_label::<PtiLabel>("PTI Best"), Some(PtiLabel::Best));
        assert_eq!(parse_label::<PtiLabel>("Magi Go"), Some(PtiLabel::Go));
        assert_eq!(parse_label::<PtiLabel>("worst"), Some(PtiLabel::Worst));
        assert_eq!(parse_label::<PtiLabel>("PTI Sunny"), None);
    }

    #[test]
    fn test_vedic_aliases() {
        assert_eq!(parse_label::<VedicLabel>("Mild GO"), Some(VedicLabel::MildGo));
        assert_eq!(parse_label::<VedicLabel>("MILDGO"), Some(VedicLabel::MildGo));
        assert_eq!(parse_label::<VedicLabel>("MEGA_STOP"), Some(VedicLabel::Avoid));
        assert_eq!(parse_label::<VedicLabel>("stop"), Some(VedicLabel::Avoid));
        assert_eq!(parse_label::<VedicLabel>("GO GO"), None);
    }

    #[test]
    fn test_personal_labels() {
        assert_eq!(
            parse_label::<PersonalLabel>("Supportive"),
            Some(PersonalLabel::Supportive)
        );
        assert_eq!(
            parse_label::<PersonalLabel>("avoid"),
            Some(PersonalLabel::Unfavorable)
        );
        assert_eq!(parse_label::<PersonalLabel>("lucky"), None);
    }

    #[test]
    fn test_blank_is_neutral() {
        assert_eq!(parse_label::<PtiLabel>(""), Some(PtiLabel::Normal));
        assert_eq!(parse_label::<VedicLabel>(" "), Some(VedicLabel::Neutral));
        assert_eq!(parse_label::<PersonalLabel>(""), Some(PersonalLabel::Neutral));
    }

    #[test]
    fn test_display_round_trips_through_parser() {
        for label in [VedicLabel::Go, VedicLabel::MildGo, VedicLabel::Avoid] {
            assert_eq!(parse_label::<VedicLabel>(&label.to_string()), Some(label));
        }
    }
}

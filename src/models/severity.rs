use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Ordinal urgency of an analysis, `Low < Medium < High < Critical`
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Raise to `other` if it is more severe; never lowers
    pub fn escalate(&mut self, other: Severity) {
        if other > *self {
            *self = other;
        }
    }

    /// Check if severity should page someone (HIGH or CRITICAL)
    pub fn is_urgent(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }

    /// Lowercase label used for metric labels
    pub fn as_label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

use crate::models::Severity;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Outcome of classifying a batch of log lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Maximum severity over every rule match and escalation
    pub severity: Severity,

    /// Cause labels in first-match order, no duplicates
    pub causes: Vec<String>,

    /// Suggestions in first-seen order, no duplicates
    pub suggestions: Vec<String>,
}

impl AnalysisResult {
    /// Record a cause unless already present; returns true if newly added
    pub fn record_cause(&mut self, cause: &str) -> bool {
        push_unique(&mut self.causes, cause)
    }

    /// Record a suggestion unless already present
    pub fn record_suggestion(&mut self, suggestion: &str) -> bool {
        push_unique(&mut self.suggestions, suggestion)
    }
}

/// Combined output handed back to adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub severity: Severity,
    pub probable_causes: Vec<String>,
    pub suggestions: Vec<String>,
    pub postmortem_path: String,
}

/// Request body for `POST /analyze`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "lines[] is required"))]
    pub lines: Vec<String>,
}

/// Append `value` to `items` unless an equal entry already exists
pub fn push_unique(items: &mut Vec<String>, value: &str) -> bool {
    if items.iter().any(|existing| existing == value) {
        return false;
    }
    items.push(value.to_string());
    true
}

/// Concatenate lists keeping first-seen order and dropping repeats
pub fn merge_unique<'a, I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut merged = Vec::new();
    for list in lists {
        for item in list {
            push_unique(&mut merged, item);
        }
    }
    merged
}

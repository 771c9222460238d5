//! Ordered rule scan over log lines.
//!
//! Every line is tested against every rule in catalog order. A rule's
//! suggestions are added the first time its cause is recorded; its severity
//! is folded into the running maximum on every match. Two policies run over
//! the whole input afterwards:
//!
//! - three or more lines carrying a `5xx` status code escalate to CRITICAL;
//! - if no cause was recorded but some line contains `error` (any case), the
//!   generic fallback cause is recorded at no less than MEDIUM.
//!
//! The fallback check is a plain substring test and will also fire on text
//! such as "no errors found".

use crate::models::{AnalysisResult, Severity};
use crate::rules::RuleCatalog;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Cause recorded when nothing specific matched but an error was logged
pub const FALLBACK_CAUSE: &str = "General error pattern detected";

/// Suggestion that accompanies [`FALLBACK_CAUSE`]
pub const FALLBACK_SUGGESTION: &str =
    "Check recent changes and roll back if errors align with a deploy.";

/// Number of 5xx lines that forces CRITICAL
pub const FIVE_XX_ESCALATION_THRESHOLD: usize = 3;

static FIVE_XX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(5\d{2})\b").expect("5xx pattern is valid"));

/// Applies a rule catalog to log lines
#[derive(Debug, Clone)]
pub struct Classifier {
    catalog: Arc<RuleCatalog>,
}

impl Classifier {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Classify lines in input order.
    ///
    /// Callers are expected to reject empty input; on an empty slice this
    /// returns LOW with no causes or suggestions.
    pub fn classify<S: AsRef<str>>(&self, lines: &[S]) -> AnalysisResult {
        let mut result = AnalysisResult::default();
        let mut five_xx_lines = 0usize;

        for line in lines {
            let line = line.as_ref();

            for rule in self.catalog.iter() {
                if !rule.matches(line) {
                    continue;
                }
                if result.record_cause(rule.cause()) {
                    for suggestion in rule.suggestions() {
                        result.record_suggestion(suggestion);
                    }
                }
                result.severity.escalate(rule.severity());
            }

            if FIVE_XX.is_match(line) {
                five_xx_lines += 1;
            }
        }

        if five_xx_lines >= FIVE_XX_ESCALATION_THRESHOLD {
            result.severity.escalate(Severity::Critical);
        }

        if result.causes.is_empty() && lines.iter().any(|l| contains_error(l.as_ref())) {
            result.record_cause(FALLBACK_CAUSE);
            result.record_suggestion(FALLBACK_SUGGESTION);
            result.severity.escalate(Severity::Medium);
        }

        result
    }
}

fn contains_error(line: &str) -> bool {
    line.to_lowercase().contains("error")
}

//! Secondary suggestion step run after classification.
//!
//! [`SuggestionAugmenter`] takes the original lines and the causes already
//! found and returns extra suggestions. The caller merges them after the
//! classifier's own list. [`RunbookAugmenter`] is the deterministic
//! implementation shipped today; a model-backed one can sit behind the same
//! trait.

use crate::error::Result;
use crate::models::push_unique;
use async_trait::async_trait;

pub const DB_RUNBOOK: &str =
    "Runbook: Validate DB DNS, port 5432 reachability, and connection pool saturation.";
pub const MEMORY_RUNBOOK: &str =
    "Runbook: Capture heap/profile; roll back high-memory features; add memory limits.";
pub const TIMELINE_RUNBOOK: &str =
    "Runbook: Correlate log timestamps with deploy/infra timeline; check dashboards.";

/// Trait for suggestion augmenters
#[async_trait]
pub trait SuggestionAugmenter: Send + Sync + 'static {
    /// Get augmenter name
    fn name(&self) -> &str;

    /// Suggestions to append for these lines and causes.
    ///
    /// The result is deduplicated against itself only.
    async fn augment(&self, lines: &[String], causes: &[String]) -> Result<Vec<String>>;
}

/// Fixed cause -> runbook lookup
#[derive(Debug, Clone, Default)]
pub struct RunbookAugmenter;

impl RunbookAugmenter {
    pub fn new() -> Self {
        Self
    }

    /// Pure lookup behind [`SuggestionAugmenter::augment`]
    pub fn runbook_suggestions<S: AsRef<str>>(lines: &[S], causes: &[String]) -> Vec<String> {
        let mut out = Vec::new();

        if causes.iter().any(|c| c.contains("Database connectivity issue")) {
            push_unique(&mut out, DB_RUNBOOK);
        }
        if causes.iter().any(|c| c.contains("Out of memory")) {
            push_unique(&mut out, MEMORY_RUNBOOK);
        }
        if out.is_empty() && !lines.is_empty() {
            push_unique(&mut out, TIMELINE_RUNBOOK);
        }

        out
    }
}

#[async_trait]
impl SuggestionAugmenter for RunbookAugmenter {
    fn name(&self) -> &str {
        "runbook"
    }

    async fn augment(&self, lines: &[String], causes: &[String]) -> Result<Vec<String>> {
        Ok(Self::runbook_suggestions(lines, causes))
    }
}

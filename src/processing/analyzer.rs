use crate::augment::{RunbookAugmenter, SuggestionAugmenter};
use crate::classifier::Classifier;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::metrics::{
    ANALYSES_TOTAL, ANALYSIS_DURATION_SECONDS, CAUSES_DETECTED_TOTAL, REDACTIONS_TOTAL,
    REPORTS_WRITTEN_TOTAL,
};
use crate::models::{merge_unique, AnalysisReport};
use crate::postmortem::PostmortemRenderer;
use crate::rules::RuleCatalog;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Message returned when an analysis is requested without lines
pub const EMPTY_INPUT_MESSAGE: &str = "lines[] is required";

/// Classifier -> augmenter -> postmortem pipeline shared by every adapter
#[derive(Clone)]
pub struct Analyzer {
    classifier: Classifier,
    augmenter: Arc<dyn SuggestionAugmenter>,
    renderer: PostmortemRenderer,
}

impl Analyzer {
    pub fn new(
        catalog: Arc<RuleCatalog>,
        augmenter: Arc<dyn SuggestionAugmenter>,
        renderer: PostmortemRenderer,
    ) -> Self {
        Self {
            classifier: Classifier::new(catalog),
            augmenter,
            renderer,
        }
    }

    /// Analyzer with the configured catalog and the runbook augmenter
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = Arc::new(RuleCatalog::load(&config.rules)?);
        let renderer = PostmortemRenderer::from_config(&config.reports)?;
        Ok(Self::new(catalog, Arc::new(RunbookAugmenter::new()), renderer))
    }

    /// Replace the suggestion augmenter
    pub fn with_augmenter(mut self, augmenter: Arc<dyn SuggestionAugmenter>) -> Self {
        self.augmenter = augmenter;
        self
    }

    pub fn catalog(&self) -> &RuleCatalog {
        self.classifier.catalog()
    }

    pub fn renderer(&self) -> &PostmortemRenderer {
        &self.renderer
    }

    /// Run a full analysis and persist its postmortem
    pub async fn analyze(&self, lines: &[String]) -> Result<AnalysisReport> {
        if lines.is_empty() {
            return Err(AppError::Validation(EMPTY_INPUT_MESSAGE.to_string()));
        }

        let analysis_id = Uuid::new_v4();
        let start = Instant::now();

        tracing::debug!(
            analysis_id = %analysis_id,
            lines = lines.len(),
            augmenter = self.augmenter.name(),
            "Starting analysis"
        );

        let result = self.run(lines).await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        ANALYSIS_DURATION_SECONDS
            .with_label_values(&[outcome])
            .observe(start.elapsed().as_secs_f64());

        if let Ok(report) = &result {
            tracing::info!(
                analysis_id = %analysis_id,
                lines = lines.len(),
                severity = %report.severity,
                causes = report.probable_causes.len(),
                suggestions = report.suggestions.len(),
                postmortem_path = %report.postmortem_path,
                "Analysis complete"
            );
        }

        result
    }

    async fn run(&self, lines: &[String]) -> Result<AnalysisReport> {
        let analysis = self.classifier.classify(lines);
        let extra = self.augmenter.augment(lines, &analysis.causes).await?;
        let suggestions = merge_unique([analysis.suggestions.as_slice(), extra.as_slice()]);

        let postmortem = self
            .renderer
            .render_and_write(lines, analysis.severity, &analysis.causes, &suggestions)
            .await?;

        ANALYSES_TOTAL
            .with_label_values(&[analysis.severity.as_label()])
            .inc();
        for cause in &analysis.causes {
            CAUSES_DETECTED_TOTAL
                .with_label_values(&[cause.as_str()])
                .inc();
        }
        for (pattern, count) in &postmortem.rendered.redaction_counts {
            REDACTIONS_TOTAL
                .with_label_values(&[*pattern])
                .inc_by(*count as u64);
        }
        REPORTS_WRITTEN_TOTAL.inc();

        Ok(AnalysisReport {
            severity: analysis.severity,
            probable_causes: analysis.causes,
            suggestions,
            postmortem_path: postmortem.path.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::{DB_RUNBOOK, TIMELINE_RUNBOOK};
    use crate::models::Severity;
    use crate::postmortem::PostmortemWriter;
    use async_trait::async_trait;
    use tempfile::TempDir;

    fn analyzer(dir: &TempDir) -> Analyzer {
        Analyzer::new(
            Arc::new(RuleCatalog::builtin().unwrap()),
            Arc::new(RunbookAugmenter::new()),
            PostmortemRenderer::new(PostmortemWriter::new(dir.path()).unwrap()),
        )
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_input_rejected_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let err = analyzer(&temp_dir).analyze(&[]).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == EMPTY_INPUT_MESSAGE));
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_suggestions_merged_after_classifier() {
        let temp_dir = TempDir::new().unwrap();
        let report = analyzer(&temp_dir)
            .analyze(&lines(&["ECONNREFUSED db-primary:5432"]))
            .await
            .unwrap();

        assert_eq!(report.severity, Severity::High);
        assert_eq!(report.probable_causes, vec!["Database connectivity issue"]);
        assert_eq!(report.suggestions.len(), 4);
        assert_eq!(report.suggestions.last().unwrap(), DB_RUNBOOK);

        let content = std::fs::read_to_string(&report.postmortem_path).unwrap();
        assert!(content.contains(&format!("- {}\n", DB_RUNBOOK)));
    }

    #[tokio::test]
    async fn test_quiet_input_gets_generic_runbook() {
        let temp_dir = TempDir::new().unwrap();
        let report = analyzer(&temp_dir)
            .analyze(&lines(&["service started", "GET /health 200"]))
            .await
            .unwrap();

        assert_eq!(report.severity, Severity::Low);
        assert!(report.probable_causes.is_empty());
        assert_eq!(report.suggestions, vec![TIMELINE_RUNBOOK]);
    }

    struct EchoAugmenter;

    #[async_trait]
    impl SuggestionAugmenter for EchoAugmenter {
        fn name(&self) -> &str {
            "echo"
        }

        async fn augment(&self, _lines: &[String], causes: &[String]) -> Result<Vec<String>> {
            // Repeats a classifier suggestion to exercise cross-list dedup
            let mut out = vec!["Audit recent permission changes.".to_string()];
            out.extend(causes.iter().map(|c| format!("Investigate: {}", c)));
            Ok(out)
        }
    }

    #[tokio::test]
    async fn test_custom_augmenter_is_deduplicated_against_classifier() {
        let temp_dir = TempDir::new().unwrap();
        let report = analyzer(&temp_dir)
            .with_augmenter(Arc::new(EchoAugmenter))
            .analyze(&lines(&["403 forbidden"]))
            .await
            .unwrap();

        assert_eq!(
            report.suggestions,
            vec![
                "Confirm token scopes/roles; rotate keys if compromised.",
                "Audit recent permission changes.",
                "Investigate: Auth / permission issue",
            ]
        );
    }

    struct FailingAugmenter;

    #[async_trait]
    impl SuggestionAugmenter for FailingAugmenter {
        fn name(&self) -> &str {
            "failing"
        }

        async fn augment(&self, _lines: &[String], _causes: &[String]) -> Result<Vec<String>> {
            Err(AppError::Internal("model unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_augmenter_failure_propagates_and_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let result = analyzer(&temp_dir)
            .with_augmenter(Arc::new(FailingAugmenter))
            .analyze(&lines(&["panic: boom"]))
            .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}

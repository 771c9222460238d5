use crate::models::Severity;
use crate::postmortem::redact::{redact_lines, RedactionOutcome};
use crate::postmortem::timeline::TimeWindow;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Markdown postmortem ready to persist
#[derive(Debug, Clone)]
pub struct RenderedPostmortem {
    pub content: String,
    pub window: TimeWindow,
    pub redaction_counts: BTreeMap<&'static str, usize>,
}

/// Render the postmortem document.
///
/// Lines are redacted before they reach the timeline section; the time
/// window is taken from the lines as received. Section order and labels are
/// scraped downstream and must stay as they are.
pub fn render_postmortem<S: AsRef<str>>(
    lines: &[S],
    severity: Severity,
    causes: &[String],
    suggestions: &[String],
    timeline_limit: usize,
) -> RenderedPostmortem {
    let RedactionOutcome {
        lines: safe_lines,
        counts,
    } = redact_lines(lines);
    let window = TimeWindow::from_lines(lines);

    let mut out = String::new();
    out.push_str("# Postmortem (auto-generated)\n\n");
    let _ = writeln!(out, "**Severity:** {}", severity);
    let _ = writeln!(out, "**Time window:** {}", window);
    out.push('\n');

    out.push_str("## Probable Causes\n");
    push_bullets(&mut out, causes, "None detected");

    out.push_str("\n## Suggestions / Runbook\n");
    push_bullets(&mut out, suggestions, "None");

    out.push_str("\n## Timeline (sample logs)\n```\n");
    let sample: Vec<&str> = safe_lines
        .iter()
        .take(timeline_limit)
        .map(String::as_str)
        .collect();
    out.push_str(&sample.join("\n"));
    out.push_str("\n```\n\n");

    out.push_str("## Next Steps\n");
    out.push_str("- Create a ticket for permanent fix and link this report.\n");
    out.push_str("- Add alerting tests to catch recurrence.\n");

    RenderedPostmortem {
        content: out,
        window,
        redaction_counts: counts,
    }
}

fn push_bullets(out: &mut String, items: &[String], empty: &str) {
    if items.is_empty() {
        let _ = writeln!(out, "- {}", empty);
        return;
    }
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
}

//! Postmortem generation
//!
//! Turns an analysis into a Markdown incident summary and persists it:
//!
//! - [`redact`]: secret redaction applied to every line before rendering
//! - [`timeline`]: timestamp extraction and the reported time window
//! - [`render`]: the Markdown document
//! - [`writer`]: collision-free persistence under the reports directory

pub mod redact;
pub mod render;
pub mod timeline;
pub mod writer;

pub use redact::{redact, redact_lines, RedactionOutcome, REDACTED};
pub use render::{render_postmortem, RenderedPostmortem};
pub use timeline::{extract_timestamps, TimeWindow};
pub use writer::PostmortemWriter;

use crate::config::{default_timeline_limit, ReportsConfig};
use crate::error::Result;
use crate::models::Severity;
use chrono::Utc;
use std::path::PathBuf;

/// A postmortem that has been written to disk
#[derive(Debug, Clone)]
pub struct Postmortem {
    pub path: PathBuf,
    pub rendered: RenderedPostmortem,
}

/// Renders and persists postmortems
#[derive(Debug, Clone)]
pub struct PostmortemRenderer {
    writer: PostmortemWriter,
    timeline_limit: usize,
}

impl PostmortemRenderer {
    pub fn new(writer: PostmortemWriter) -> Self {
        Self {
            writer,
            timeline_limit: default_timeline_limit(),
        }
    }

    pub fn from_config(config: &ReportsConfig) -> Result<Self> {
        Ok(Self::new(PostmortemWriter::from_config(config)?)
            .with_timeline_limit(config.timeline_limit))
    }

    /// Set how many redacted lines the timeline section shows
    pub fn with_timeline_limit(mut self, limit: usize) -> Self {
        self.timeline_limit = limit;
        self
    }

    pub fn writer(&self) -> &PostmortemWriter {
        &self.writer
    }

    /// Render the document without touching the filesystem
    pub fn render(
        &self,
        lines: &[String],
        severity: Severity,
        causes: &[String],
        suggestions: &[String],
    ) -> RenderedPostmortem {
        render_postmortem(lines, severity, causes, suggestions, self.timeline_limit)
    }

    /// Render and write; filesystem errors propagate to the caller
    pub async fn render_and_write(
        &self,
        lines: &[String],
        severity: Severity,
        causes: &[String],
        suggestions: &[String],
    ) -> Result<Postmortem> {
        let rendered = self.render(lines, severity, causes, suggestions);
        let path = self.writer.write(&rendered.content, Utc::now()).await?;
        Ok(Postmortem { path, rendered })
    }
}

//! Log classification and postmortem generation.
//!
//! Raw log lines go through an ordered rule scan ([`classifier`]), a
//! suggestion step ([`augment`]) and a redacting Markdown renderer
//! ([`postmortem`]). [`processing::Analyzer`] wires the three together for
//! the HTTP server and the CLI.

pub mod api;
pub mod augment;
pub mod classifier;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod postmortem;
pub mod processing;
pub mod rules;

pub use error::{AppError, Result};
pub use models::{AnalysisReport, AnalysisResult, Severity};
pub use processing::Analyzer;

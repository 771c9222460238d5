pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::processing::Analyzer;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub metrics_enabled: bool,
}

impl AppState {
    pub fn new(analyzer: Arc<Analyzer>) -> Self {
        Self {
            analyzer,
            metrics_enabled: true,
        }
    }

    /// Enable or disable the `/metrics` endpoint
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }
}

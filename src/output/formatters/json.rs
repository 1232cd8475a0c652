//! JSON output formatter

use crate::output::ReportFormatter;
use crate::summary::CorpusSummary;

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, summary: &CorpusSummary) -> Result<String, serde_json::Error> {
        summary.to_json()
    }
}

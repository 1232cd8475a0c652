//! Output formatting module for fencescan
//!
//! This module renders a [`CorpusSummary`] as a report and routes it to
//! stdout/stderr.

use crate::summary::CorpusSummary;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::str::FromStr;

pub mod formatters;

// Re-export formatters
pub use formatters::*;

/// Trait for report formatters
pub trait ReportFormatter {
    /// Render the full report
    fn format_report(&self, summary: &CorpusSummary) -> Result<String, serde_json::Error>;

    /// One line per per-document error, for stderr
    fn format_errors(&self, summary: &CorpusSummary) -> Vec<String> {
        summary
            .malformed
            .iter()
            .map(|m| m.to_string())
            .chain(summary.unreadable.iter().map(|u| u.to_string()))
            .collect()
    }
}

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Machine-readable JSON report
    #[default]
    Json,
    /// Human-readable tables
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl OutputFormat {
    /// Create a formatter instance for this format
    pub fn create_formatter(&self) -> Box<dyn ReportFormatter> {
        match self {
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Text => Box::new(TextFormatter::new()),
        }
    }
}

/// Output writer that handles stdout/stderr routing
pub struct OutputWriter {
    quiet: bool,
}

impl OutputWriter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Write the report to stdout. Always written, even in quiet mode.
    pub fn write_report(&self, content: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()
    }

    /// Write an error line to stderr unless quiet
    pub fn write_error(&self, content: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{content}")
    }
}

//! Human-readable text report with colors

use crate::output::ReportFormatter;
use crate::summary::CorpusSummary;
use colored::*;
use std::fmt::Write;

/// Default human-readable formatter with colors
pub struct TextFormatter {
    use_colors: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    fn heading(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn count(&self, n: usize, problem: bool) -> String {
        match (self.use_colors, problem && n > 0) {
            (true, true) => n.to_string().red().bold().to_string(),
            (true, false) => n.to_string().cyan().to_string(),
            (false, _) => n.to_string(),
        }
    }
}

impl ReportFormatter for TextFormatter {
    fn format_report(&self, summary: &CorpusSummary) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{} {}", self.heading("Documents:"), self.count(summary.total_documents, false));
        let _ = writeln!(out, "{} {}", self.heading("Code blocks:"), self.count(summary.total_blocks, false));

        if !summary.by_language.is_empty() {
            let _ = writeln!(out, "\n{}", self.heading("By language:"));
            for (language, count) in &summary.by_language {
                let _ = writeln!(out, "  {:<12} {}", language.as_str(), self.count(*count, false));
            }
        }

        if !summary.by_document.is_empty() {
            let width = summary.by_document.keys().map(|p| p.chars().count()).max().unwrap_or(0);
            let _ = writeln!(out, "\n{}", self.heading("By document:"));
            for (path, count) in &summary.by_document {
                let _ = writeln!(out, "  {path:<width$} {}", self.count(*count, false));
            }
        }

        if !summary.blocks.is_empty() {
            let _ = writeln!(out, "\n{}", self.heading("Blocks:"));
            for (path, records) in &summary.blocks {
                for record in records {
                    let _ = writeln!(
                        out,
                        "  {path}:{}-{} {} ({})",
                        record.start_line,
                        record.end_line,
                        record.language,
                        if record.tag.is_empty() { "no tag" } else { record.tag.as_str() }
                    );
                }
            }
        }

        let _ = writeln!(
            out,
            "\n{} {}",
            self.heading("Malformed blocks:"),
            self.count(summary.malformed.len(), true)
        );
        for malformed in &summary.malformed {
            let _ = writeln!(out, "  {malformed}");
        }

        if !summary.unreadable.is_empty() {
            let _ = writeln!(
                out,
                "{} {}",
                self.heading("Unreadable documents:"),
                self.count(summary.unreadable.len(), true)
            );
            for unreadable in &summary.unreadable {
                let _ = writeln!(out, "  {unreadable}");
            }
        }

        // Remove trailing newline
        if out.ends_with('\n') {
            out.pop();
        }
        Ok(out)
    }
}

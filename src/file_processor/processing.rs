//! Per-document reading and scanning.

use crate::code_blocks::{BlockScanner, LanguageClassifier};
use crate::summary::{Aggregator, UnreadableDocument};
use std::fs;
use std::path::Path;

use super::discovery::to_display_path;

/// One Markdown file, read once and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Display path, relative to the scan root
    pub path: String,
    pub content: String,
}

impl Document {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Read `file_path`, naming the document relative to `root`.
    pub fn read(file_path: &Path, root: &Path) -> Result<Self, UnreadableDocument> {
        let path = to_display_path(file_path, root);
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(Self { path, content }),
            Err(e) => Err(UnreadableDocument {
                path,
                error: e.to_string(),
            }),
        }
    }

    /// Iterate this document's fenced code blocks.
    pub fn blocks(&self) -> BlockScanner<'_> {
        BlockScanner::new(&self.path, &self.content)
    }
}

/// Scan, classify and record every block of one document.
pub fn scan_document(document: &Document, classifier: &LanguageClassifier, aggregator: &mut Aggregator) {
    let items = document
        .blocks()
        .map(|item| item.map(|block| classifier.classify_block(block)));
    aggregator.record_document(&document.path, items);
}

/// Read and scan one file. Read failures are recorded, never returned.
pub fn process_file(file_path: &Path, root: &Path, classifier: &LanguageClassifier, aggregator: &mut Aggregator) {
    match Document::read(file_path, root) {
        Ok(document) => {
            log::debug!("Scanning {}", document.path);
            scan_document(&document, classifier, aggregator);
        }
        Err(unreadable) => {
            log::warn!("Error reading file {}: {}", unreadable.path, unreadable.error);
            aggregator.record_unreadable(unreadable);
        }
    }
}

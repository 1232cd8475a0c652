pub mod code_blocks;
pub mod config;
pub mod exit_codes;
pub mod file_processor;
pub mod output;
pub mod parallel;
pub mod summary;

pub use crate::code_blocks::{BlockScanner, ClassifiedBlock, CodeBlock, Language, LanguageClassifier, MalformedBlock};
pub use crate::file_processor::{DiscoveryError, DiscoveryOptions, Document};
pub use crate::parallel::{CancellationToken, ParallelConfig, ScanOutcome};
pub use crate::summary::{Aggregator, CorpusSummary, UnreadableDocument};

use crate::parallel::{FileParallelProcessor, ScanContext};
use std::path::Path;
use std::time::Instant;

/// Fatal errors. Per-document problems are recorded in the summary instead.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("Failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Everything that controls one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub discovery: DiscoveryOptions,
    pub parallel: ParallelConfig,
    pub classifier: LanguageClassifier,
    /// Keep a per-document listing of blocks in the summary
    pub retain_blocks: bool,
}

/// Scan every Markdown document under `root`.
///
/// Fails only when the root is invalid or the scan cannot start. Unreadable
/// documents and unterminated fences end up in the returned summary.
pub fn scan(root: &Path, options: &ScanOptions, cancel: &CancellationToken) -> Result<ScanOutcome, ScanError> {
    let start = Instant::now();

    let files = file_processor::find_markdown_files(root, &options.discovery)?;
    let ctx = ScanContext {
        root,
        classifier: &options.classifier,
        retain_blocks: options.retain_blocks,
    };
    let outcome = FileParallelProcessor::new(options.parallel.clone()).process_files(&files, ctx, cancel)?;

    log::info!(
        "Scanned {} documents ({} blocks) in {:?}",
        outcome.summary.total_documents,
        outcome.summary.total_blocks,
        start.elapsed()
    );
    Ok(outcome)
}

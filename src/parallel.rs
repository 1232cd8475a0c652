//! Parallel file processing module for fencescan
//!
//! This module implements file-level parallel scanning. Each worker folds
//! documents into its own partial summary; partials are merged by a reduce
//! step, so no state is shared between workers.

use crate::code_blocks::LanguageClassifier;
use crate::file_processor::process_file;
use crate::summary::{Aggregator, CorpusSummary};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Configuration for parallel execution
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Enable/disable parallel execution
    pub enabled: bool,
    /// Number of threads to use (None = auto-detect)
    pub thread_count: Option<usize>,
    /// Minimum number of files to enable parallel execution
    pub min_file_count: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            thread_count: None, // Auto-detect based on CPU cores
            min_file_count: 2,  // At least 2 files to benefit from parallelization
        }
    }
}

/// Cooperative cancellation flag shared between the caller and the scan.
///
/// Checked before each document starts; documents already being scanned
/// run to completion.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of scanning a list of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub summary: CorpusSummary,
    /// Files discovered
    pub files_total: usize,
    /// Files skipped because the scan was cancelled
    pub files_skipped: usize,
}

impl ScanOutcome {
    pub fn cancelled(&self) -> bool {
        self.files_skipped > 0
    }
}

/// Per-scan inputs shared read-only by all workers.
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    pub root: &'a Path,
    pub classifier: &'a LanguageClassifier,
    pub retain_blocks: bool,
}

/// File-level parallel processing for multiple files
pub struct FileParallelProcessor {
    config: ParallelConfig,
}

impl FileParallelProcessor {
    pub fn new(config: ParallelConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self::new(ParallelConfig::default())
    }

    /// Scan `files`, in parallel when worthwhile.
    pub fn process_files(
        &self,
        files: &[PathBuf],
        ctx: ScanContext<'_>,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome, rayon::ThreadPoolBuildError> {
        let start = Instant::now();

        let aggregator = if self.should_use_parallel(files) {
            let mut pool = rayon::ThreadPoolBuilder::new();
            if let Some(thread_count) = self.config.thread_count {
                pool = pool.num_threads(thread_count);
            }
            let pool = pool.build()?;
            log::debug!("Scanning {} files on {} threads", files.len(), pool.current_num_threads());

            pool.install(|| {
                files
                    .par_iter()
                    .fold(
                        || Aggregator::new(ctx.retain_blocks),
                        |mut aggregator, path| {
                            scan_one(path, ctx, cancel, &mut aggregator);
                            aggregator
                        },
                    )
                    .reduce(|| Aggregator::new(ctx.retain_blocks), Aggregator::merged)
            })
        } else {
            log::debug!("Scanning {} files sequentially", files.len());
            let mut aggregator = Aggregator::new(ctx.retain_blocks);
            for path in files {
                scan_one(path, ctx, cancel, &mut aggregator);
            }
            aggregator
        };

        let summary = aggregator.finish();
        let processed = summary.documents_processed();
        log::debug!("Scanned {processed} files in {:?}", start.elapsed());

        Ok(ScanOutcome {
            summary,
            files_total: files.len(),
            files_skipped: files.len().saturating_sub(processed),
        })
    }

    /// Determine if file-level parallel processing should be used
    pub fn should_use_parallel(&self, files: &[PathBuf]) -> bool {
        if !self.config.enabled {
            return false;
        }

        // Need at least minimum files to benefit from parallelization
        if files.len() < self.config.min_file_count {
            return false;
        }

        // An explicit single thread is sequential
        if self.config.thread_count == Some(1) {
            return false;
        }

        // Check if we have enough CPU cores
        self.config.thread_count.is_some() || num_cpus::get() >= 2
    }
}

fn scan_one(path: &Path, ctx: ScanContext<'_>, cancel: &CancellationToken, aggregator: &mut Aggregator) {
    if cancel.is_cancelled() {
        return;
    }
    process_file(path, ctx.root, ctx.classifier, aggregator);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn corpus() -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempdir().unwrap();
        let docs = [
            ("a.md", "```css\n.a{}\n```\n"),
            ("b.md", "```js\nlet b;\n```\n```ts\nlet c: number;\n```\n"),
            ("c.md", "no code here\n"),
            ("d.md", "```bash\nls\n```\n```json\n"),
            ("e.md", "```JavaScript\nx\n```\n"),
        ];
        let mut files = Vec::new();
        for (name, content) in docs {
            let path = dir.path().join(name);
            fs::write(&path, content).unwrap();
            files.push(path);
        }
        (dir, files)
    }

    #[test]
    fn test_parallel_config_defaults() {
        let config = ParallelConfig::default();
        assert!(config.enabled);
        assert_eq!(config.min_file_count, 2);
        assert_eq!(config.thread_count, None);
    }

    #[test]
    fn test_should_use_parallel_logic() {
        let processor = FileParallelProcessor::new(ParallelConfig {
            thread_count: Some(2),
            ..ParallelConfig::default()
        });

        assert!(!processor.should_use_parallel(&[PathBuf::from("test.md")]));
        assert!(processor.should_use_parallel(&[PathBuf::from("a.md"), PathBuf::from("b.md")]));

        let disabled = FileParallelProcessor::new(ParallelConfig {
            enabled: false,
            ..ParallelConfig::default()
        });
        assert!(!disabled.should_use_parallel(&[PathBuf::from("a.md"), PathBuf::from("b.md")]));

        let single = FileParallelProcessor::new(ParallelConfig {
            thread_count: Some(1),
            ..ParallelConfig::default()
        });
        assert!(!single.should_use_parallel(&[PathBuf::from("a.md"), PathBuf::from("b.md")]));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (dir, files) = corpus();
        let classifier = LanguageClassifier::new();
        let ctx = ScanContext {
            root: dir.path(),
            classifier: &classifier,
            retain_blocks: true,
        };

        let sequential = FileParallelProcessor::new(ParallelConfig {
            enabled: false,
            ..ParallelConfig::default()
        })
        .process_files(&files, ctx, &CancellationToken::new())
        .unwrap();

        let parallel = FileParallelProcessor::new(ParallelConfig {
            thread_count: Some(2),
            ..ParallelConfig::default()
        })
        .process_files(&files, ctx, &CancellationToken::new())
        .unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(parallel.summary.total_documents, 5);
        assert_eq!(parallel.summary.total_blocks, 5);
        assert_eq!(parallel.summary.malformed.len(), 1);
        assert!(!parallel.cancelled());
    }

    #[test]
    fn test_file_order_does_not_matter() {
        let (dir, files) = corpus();
        let classifier = LanguageClassifier::new();
        let ctx = ScanContext {
            root: dir.path(),
            classifier: &classifier,
            retain_blocks: false,
        };
        let processor = FileParallelProcessor::with_default_config();

        let forward = processor.process_files(&files, ctx, &CancellationToken::new()).unwrap();
        let mut reversed_files = files.clone();
        reversed_files.reverse();
        let reversed = processor
            .process_files(&reversed_files, ctx, &CancellationToken::new())
            .unwrap();

        assert_eq!(
            forward.summary.to_json().unwrap(),
            reversed.summary.to_json().unwrap()
        );
    }

    #[test]
    fn test_cancelled_before_start_skips_everything() {
        let (dir, files) = corpus();
        let classifier = LanguageClassifier::new();
        let ctx = ScanContext {
            root: dir.path(),
            classifier: &classifier,
            retain_blocks: false,
        };
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = FileParallelProcessor::with_default_config()
            .process_files(&files, ctx, &cancel)
            .unwrap();

        assert!(outcome.cancelled());
        assert_eq!(outcome.files_total, 5);
        assert_eq!(outcome.files_skipped, 5);
        assert_eq!(outcome.summary, CorpusSummary::new());
    }

    #[test]
    fn test_cancellation_between_documents() {
        let (dir, files) = corpus();
        let classifier = LanguageClassifier::new();
        let ctx = ScanContext {
            root: dir.path(),
            classifier: &classifier,
            retain_blocks: false,
        };
        let cancel = CancellationToken::new();

        let mut aggregator = Aggregator::new(false);
        for (i, path) in files.iter().enumerate() {
            if i == 2 {
                cancel.cancel();
            }
            scan_one(path, ctx, &cancel, &mut aggregator);
        }

        let summary = aggregator.finish();
        assert_eq!(summary.total_documents, 2);
        assert_eq!(summary.total_blocks, 3);
    }
}

//! Library-level tests for `fencescan_lib::scan`.

use fencescan_lib::{CancellationToken, DiscoveryError, Language, ParallelConfig, ScanError, ScanOptions, scan};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

fn options(parallel: ParallelConfig) -> ScanOptions {
    ScanOptions {
        parallel,
        retain_blocks: true,
        ..ScanOptions::default()
    }
}

#[test]
fn test_two_workers_match_sequential() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one.md"), "```js\na\n```\n\n```css\nb{}\n```\n").unwrap();
    fs::write(dir.path().join("two.md"), "```JavaScript\nc\n```\n```\nplain\n```\n").unwrap();

    let sequential = scan(
        dir.path(),
        &options(ParallelConfig {
            enabled: false,
            ..ParallelConfig::default()
        }),
        &CancellationToken::new(),
    )
    .unwrap();
    let parallel = scan(
        dir.path(),
        &options(ParallelConfig {
            thread_count: Some(2),
            ..ParallelConfig::default()
        }),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(parallel.summary.total_documents, sequential.summary.total_documents);
    assert_eq!(parallel.summary.total_blocks, sequential.summary.total_blocks);
    assert_eq!(parallel.summary, sequential.summary);
    assert_eq!(parallel.summary.total_documents, 2);
    assert_eq!(parallel.summary.total_blocks, 4);
    assert_eq!(parallel.summary.blocks_for(Language::Javascript), 2);
    assert_eq!(parallel.summary.blocks_for(Language::Unknown), 1);
}

#[test]
fn test_invalid_root_is_fatal() {
    let dir = tempdir().unwrap();
    let err = scan(
        &dir.path().join("missing"),
        &ScanOptions::default(),
        &CancellationToken::new(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ScanError::Discovery(DiscoveryError::InvalidRoot { .. })
    ));
}

#[test]
fn test_invalid_exclude_pattern_is_fatal() {
    let dir = tempdir().unwrap();
    let mut options = ScanOptions::default();
    options.discovery.exclude = vec!["docs/[".to_string()];

    let err = scan(dir.path(), &options, &CancellationToken::new()).unwrap_err();
    assert!(err.to_string().contains("docs/["));
}

#[test]
fn test_cancelled_scan_reports_skipped_files() {
    let dir = tempdir().unwrap();
    for name in ["a.md", "b.md", "c.md"] {
        fs::write(dir.path().join(name), "```ts\nx\n```\n").unwrap();
    }
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = scan(dir.path(), &ScanOptions::default(), &cancel).unwrap();
    assert!(outcome.cancelled());
    assert_eq!(outcome.files_total, 3);
    assert_eq!(outcome.summary.total_documents, 0);
}

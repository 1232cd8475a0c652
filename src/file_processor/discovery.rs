//! File discovery, path utilities, and pattern expansion

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use std::path::{Component, Path, PathBuf};

/// Errors that abort discovery before any document is scanned.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The scan root does not exist or is not a directory
    #[error("Invalid root '{path}': {reason}")]
    InvalidRoot { path: String, reason: &'static str },

    /// An include/exclude glob could not be compiled
    #[error("Invalid {kind} pattern '{pattern}': {source}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        source: ignore::Error,
    },

    /// The file type matcher could not be built
    #[error("Invalid markdown extension list: {0}")]
    InvalidExtensions(#[source] ignore::Error),
}

/// Options controlling which files are scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub respect_gitignore: bool,
    /// Extensions without the leading dot
    pub extensions: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            respect_gitignore: true,
            extensions: vec!["md".to_string(), "markdown".to_string()],
        }
    }
}

/// Expands directory-style patterns to also match files within them.
/// Pattern "dir/path" becomes ["dir/path", "dir/path/**"] to match both
/// the directory itself and all contents recursively.
///
/// Patterns containing glob characters (*, ?, [) are returned unchanged.
fn expand_directory_pattern(pattern: &str) -> Vec<String> {
    if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
        return vec![pattern.to_string()];
    }

    let base = pattern.trim_end_matches('/');
    vec![base.to_string(), format!("{base}/**")]
}

/// Fail with `InvalidRoot` unless `root` is an existing directory.
pub fn validate_root(root: &Path) -> Result<(), DiscoveryError> {
    if !root.exists() {
        return Err(DiscoveryError::InvalidRoot {
            path: root.display().to_string(),
            reason: "path does not exist",
        });
    }
    if !root.is_dir() {
        return Err(DiscoveryError::InvalidRoot {
            path: root.display().to_string(),
            reason: "not a directory",
        });
    }
    Ok(())
}

/// Convert a file path to the path shown in reports: relative to the scan
/// root, `/`-separated, so reports are identical across machines.
///
/// Falls back to the path as given when it is not under `root`.
pub fn to_display_path(file_path: &Path, root: &Path) -> String {
    let relative = file_path.strip_prefix(root).unwrap_or(file_path);
    let mut display = String::new();
    for component in relative.components() {
        match component {
            Component::CurDir => {}
            Component::RootDir => display.push('/'),
            other => {
                if !display.is_empty() && !display.ends_with('/') {
                    display.push('/');
                }
                display.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    display
}

fn has_markdown_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Recursively find the Markdown files under `root`, sorted and deduplicated.
pub fn find_markdown_files(root: &Path, options: &DiscoveryOptions) -> Result<Vec<PathBuf>, DiscoveryError> {
    validate_root(root)?;

    let mut walk_builder = WalkBuilder::new(root);

    // --- Markdown file type definition ---
    let mut types_builder = ignore::types::TypesBuilder::new();
    for ext in &options.extensions {
        types_builder
            .add("markdown", &format!("*.{ext}"))
            .map_err(DiscoveryError::InvalidExtensions)?;
    }
    types_builder.select("markdown");
    let types = types_builder.build().map_err(DiscoveryError::InvalidExtensions)?;
    walk_builder.types(types);

    // --- Include/exclude overrides, relative to the root ---
    let exclude_patterns: Vec<String> = options
        .exclude
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .flat_map(expand_directory_pattern)
        .collect();
    log::debug!("Exclude patterns: {exclude_patterns:?}");

    if !options.include.is_empty() || !exclude_patterns.is_empty() {
        let mut override_builder = OverrideBuilder::new(root);

        // Bare patterns act as includes: only matching files are walked.
        for pattern in options.include.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
            override_builder
                .add(pattern)
                .map_err(|source| DiscoveryError::InvalidPattern {
                    kind: "include",
                    pattern: pattern.to_string(),
                    source,
                })?;
        }

        // Excludes must start with '!'
        for pattern in &exclude_patterns {
            let exclude_rule = if pattern.starts_with('!') {
                pattern.clone()
            } else {
                format!("!{pattern}")
            };
            override_builder
                .add(&exclude_rule)
                .map_err(|source| DiscoveryError::InvalidPattern {
                    kind: "exclude",
                    pattern: pattern.clone(),
                    source,
                })?;
        }

        let overrides = override_builder
            .build()
            .map_err(|source| DiscoveryError::InvalidPattern {
                kind: "override",
                pattern: options.include.join(","),
                source,
            })?;
        walk_builder.overrides(overrides);
    }

    let use_gitignore = options.respect_gitignore;
    walk_builder.ignore(use_gitignore); // Enable/disable .ignore
    walk_builder.git_ignore(use_gitignore); // Enable/disable .gitignore
    walk_builder.git_global(use_gitignore); // Enable/disable global gitignore
    walk_builder.git_exclude(use_gitignore); // Enable/disable .git/info/exclude
    walk_builder.parents(use_gitignore); // Enable/disable parent ignores
    walk_builder.hidden(false); // Include hidden files and directories
    walk_builder.require_git(false); // Process git ignores even if no repo detected
    walk_builder.filter_entry(|entry| entry.file_name() != ".git");

    let mut file_paths = Vec::new();
    for result in walk_builder.build() {
        match result {
            Ok(entry) => {
                if entry.file_type().is_some_and(|ft| ft.is_file()) {
                    file_paths.push(entry.into_path());
                }
            }
            Err(err) => log::warn!("Error walking directory: {err}"),
        }
    }

    file_paths.sort();
    file_paths.dedup();
    // Overrides may whitelist files the type filter would have dropped.
    file_paths.retain(|path| has_markdown_extension(path, &options.extensions));

    log::debug!("Discovered {} markdown files under {}", file_paths.len(), root.display());
    Ok(file_paths)
}

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Root directory to scan for Markdown files
    pub root: PathBuf,

    /// Report format
    #[arg(long, short = 'f', value_parser = ["json", "text"],
          help = "Report format: json (default, or output-format in config) or text")]
    pub format: Option<String>,

    /// Exit with code 1 if any malformed block or unreadable document is found
    #[arg(long, help = "Exit with code 1 if any malformed block or unreadable document is found")]
    pub fail_on_malformed: bool,

    /// Configuration file path
    #[arg(long, short = 'c', help = "Configuration file (default: <root>/.fencescan.toml)")]
    pub config: Option<PathBuf>,

    /// Ignore any configuration file
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Include only specific files or directories (comma-separated glob patterns)
    #[arg(long)]
    pub include: Option<String>,

    /// Exclude specific files or directories (comma-separated glob patterns)
    #[arg(long)]
    pub exclude: Option<String>,

    /// Respect .gitignore files when scanning directories
    /// When not specified, uses config file value (default: true)
    #[arg(
        long,
        num_args(0..=1),
        require_equals(true),
        default_missing_value = "true",
        help = "Respect .gitignore files when scanning directories"
    )]
    pub respect_gitignore: Option<bool>,

    /// Number of worker threads (default: one per core)
    #[arg(long, short = 'j', value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,

    /// List every block per document in the report
    #[arg(long)]
    pub blocks: bool,
}

/// Split a comma-separated CLI list, dropping empty entries.
pub fn split_patterns(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

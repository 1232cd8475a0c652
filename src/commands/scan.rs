//! Handler for the `scan` command.

use anyhow::Context;
use colored::*;

use crate::cli_types::{ScanArgs, split_patterns};
use fencescan_lib::config::Config;
use fencescan_lib::exit_codes::{MALFORMED_FOUND, SUCCESS, TOOL_ERROR};
use fencescan_lib::file_processor::validate_root;
use fencescan_lib::output::{OutputFormat, OutputWriter};
use fencescan_lib::{CancellationToken, DiscoveryOptions, ParallelConfig, ScanOptions};

/// Run a scan and print the report. Returns the exit code.
pub fn handle_scan(args: &ScanArgs, quiet: bool) -> i32 {
    match run_scan(args, quiet) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e:#}", "Error".red().bold());
            TOOL_ERROR
        }
    }
}

fn run_scan(args: &ScanArgs, quiet: bool) -> anyhow::Result<i32> {
    validate_root(&args.root)?;

    let config = load_config(args)?;
    let format = match &args.format {
        Some(name) => name.parse::<OutputFormat>().map_err(anyhow::Error::msg)?,
        None => config.output_format.unwrap_or_default(),
    };
    let fail_on_malformed = args.fail_on_malformed || config.fail_on_malformed;
    let options = build_scan_options(args, &config);

    let outcome = fencescan_lib::scan(&args.root, &options, &CancellationToken::new())?;
    let summary = &outcome.summary;

    let formatter = format.create_formatter();
    let report = formatter.format_report(summary).context("Failed to render report")?;
    let writer = OutputWriter::new(quiet);

    // JSON carries the errors in the report itself
    if format == OutputFormat::Text {
        for line in formatter.format_errors(summary) {
            writer.write_error(&format!("{}: {line}", "warning".yellow().bold()))?;
        }
    }
    writer.write_report(&report)?;

    if fail_on_malformed && summary.has_errors() {
        Ok(MALFORMED_FOUND)
    } else {
        Ok(SUCCESS)
    }
}

/// `--config` wins, then `<root>/.fencescan.toml`, then defaults.
fn load_config(args: &ScanArgs) -> anyhow::Result<Config> {
    if args.no_config {
        return Ok(Config::default());
    }
    if let Some(path) = &args.config {
        return Ok(Config::load(path)?);
    }
    match Config::discover(&args.root)? {
        Some((path, config)) => {
            log::debug!("Using config file {}", path.display());
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

/// Command-line flags override the configuration file.
fn build_scan_options(args: &ScanArgs, config: &Config) -> ScanOptions {
    let include = match &args.include {
        Some(value) => split_patterns(value),
        None => config.include.clone(),
    };
    let exclude = match &args.exclude {
        Some(value) => split_patterns(value),
        None => config.exclude.clone(),
    };

    ScanOptions {
        discovery: DiscoveryOptions {
            include,
            exclude,
            respect_gitignore: args.respect_gitignore.unwrap_or(config.respect_gitignore),
            extensions: config.extensions.clone(),
        },
        parallel: ParallelConfig {
            thread_count: args.threads.map(usize::from).or(config.threads),
            ..ParallelConfig::default()
        },
        classifier: config.classifier(),
        retain_blocks: args.blocks,
    }
}

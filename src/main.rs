use clap::{Parser, Subcommand};
use clap_complete::Shell;

use fencescan_lib::exit_codes::{MALFORMED_FOUND, SUCCESS, exit};

mod cli_types;
mod commands;

use cli_types::ScanArgs;

#[cfg(all(not(target_env = "msvc"), not(target_arch = "wasm32")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser)]
#[command(name = "fencescan", author, version, about, long_about = None)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    command: Commands,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print the report; suppress per-error lines and warnings
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory and report its fenced code blocks
    Scan(ScanArgs),

    /// List the recognized languages and their aliases
    Languages {
        /// Output format
        #[arg(long, short = 'f', value_parser = ["text", "json"], default_value = "text")]
        format: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (detected from $SHELL if omitted)
        shell: Option<Shell>,

        /// List available shells
        #[arg(long)]
        list: bool,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        "fencescan=debug,fencescan_lib=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let code = match &cli.command {
        Commands::Scan(args) => commands::scan::handle_scan(args, cli.quiet),
        Commands::Languages { format } => commands::languages::handle_languages(format),
        Commands::Completions { shell, list } => commands::completions::handle_completions(*shell, *list),
    };

    match code {
        SUCCESS => exit::success(),
        MALFORMED_FOUND => exit::malformed_found(),
        _ => exit::tool_error(),
    }
}

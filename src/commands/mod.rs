//! Command handlers for the fencescan CLI.
//!
//! Each subcommand has its own module with a public handler function
//! that `main()` dispatches to. Handlers return the process exit code.

pub mod completions;
pub mod languages;
pub mod scan;

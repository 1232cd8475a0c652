//! Process exit codes for the `fencescan` binary.
//!
//! Malformed blocks only affect the exit code when the user asks for it, so
//! a plain scan of a messy corpus still exits 0.

/// The scan ran and the report was written.
pub const SUCCESS: i32 = 0;

/// `--fail-on-malformed` (or `fail-on-malformed = true`) is set and at least
/// one unterminated fence or unreadable document was found.
pub const MALFORMED_FOUND: i32 = 1;

/// No report: bad root, bad configuration or include/exclude pattern, or a
/// failure writing output.
pub const TOOL_ERROR: i32 = 2;

/// Terminate the process with one of the codes above.
pub mod exit {
    use super::{MALFORMED_FOUND, SUCCESS, TOOL_ERROR};

    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    pub fn malformed_found() -> ! {
        std::process::exit(MALFORMED_FOUND);
    }

    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}

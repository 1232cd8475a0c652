//! File discovery and per-document processing.

mod discovery;
mod processing;

pub use discovery::*;
pub use processing::*;

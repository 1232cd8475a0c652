//! Fenced code block extraction and language classification.
//!
//! A Markdown document is scanned line by line for fenced code blocks.
//! Each block's language tag is then resolved against a closed set of
//! languages:
//!
//! - `js`, `JavaScript`, `node` → `javascript`
//! - `ts`, `mts` → `typescript`
//! - `jsx`, `tsx` → `jsx`
//! - `sh`, `shell`, `zsh` → `bash`
//!
//! Anything that does not resolve is classified as `unknown`.
//! See [`linguist`] for the full alias table.
//!
//! ```
//! use fencescan_lib::code_blocks::{BlockScanner, Language, LanguageClassifier};
//!
//! let doc = "# Card\n\n```CSS\n.card {}\n```\n";
//! let classifier = LanguageClassifier::new();
//! let blocks: Vec<_> = BlockScanner::new("card.md", doc)
//!     .map(|item| item.map(|block| classifier.classify_block(block)))
//!     .collect();
//!
//! assert_eq!(blocks.len(), 1);
//! let block = blocks[0].as_ref().unwrap();
//! assert_eq!(block.language, Language::Css);
//! assert_eq!(block.block.start_line, 3);
//! ```

pub mod language;
pub mod linguist;
pub mod scanner;

pub use language::{Language, UnknownLanguage};
pub use linguist::{LanguageClassifier, language_tag};
pub use scanner::{BlockScanner, ClassifiedBlock, CodeBlock, MalformedBlock};

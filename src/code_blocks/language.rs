//! The closed set of languages a code block can be classified as.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalized language identifier.
///
/// Variants are declared in name order, so the derived `Ord` sorts the same
/// way as the serialized identifiers. Reports rely on this for stable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Bash,
    Css,
    Html,
    Javascript,
    Json,
    /// JavaScript variants with embedded markup (JSX, TSX).
    Jsx,
    Typescript,
    Unknown,
}

impl Language {
    /// Every member of the set, in name order.
    pub const ALL: [Language; 8] = [
        Language::Bash,
        Language::Css,
        Language::Html,
        Language::Javascript,
        Language::Json,
        Language::Jsx,
        Language::Typescript,
        Language::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Bash => "bash",
            Language::Css => "css",
            Language::Html => "html",
            Language::Javascript => "javascript",
            Language::Json => "json",
            Language::Jsx => "jsx",
            Language::Typescript => "typescript",
            Language::Unknown => "unknown",
        }
    }

    /// Short human description, used by the `languages` command.
    pub fn description(self) -> &'static str {
        match self {
            Language::Bash => "Shell scripts and terminal sessions",
            Language::Css => "Stylesheets, including SCSS/Sass/Less",
            Language::Html => "HTML markup",
            Language::Javascript => "JavaScript and Node.js",
            Language::Json => "JSON documents (JSONC, JSON5)",
            Language::Jsx => "JavaScript variants with embedded markup (JSX, TSX)",
            Language::Typescript => "TypeScript",
            Language::Unknown => "Missing or unrecognized language tag",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a member of the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language identifier '{0}' (expected one of: bash, css, html, javascript, json, jsx, typescript, unknown)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Parses a canonical identifier. Aliases are not accepted here; use
    /// [`crate::code_blocks::LanguageClassifier`] for that.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str() == lower)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

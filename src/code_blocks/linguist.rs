//! Language tag resolution.
//!
//! Maps the free-text tag of a fenced code block (e.g. "js", "JavaScript",
//! "zsh") to one member of the closed [`Language`] set. The alias table is
//! explicit: anything not in it is [`Language::Unknown`].

use super::language::Language;
use super::scanner::{ClassifiedBlock, CodeBlock};
use std::collections::HashMap;

/// Built-in alias table. Canonical identifiers map to themselves.
///
/// Keys are lowercase and unique.
pub const BUILTIN_ALIASES: &[(&str, Language)] = &[
    // Shell
    ("bash", Language::Bash),
    ("sh", Language::Bash),
    ("shell", Language::Bash),
    ("zsh", Language::Bash),
    ("ksh", Language::Bash),
    ("shellscript", Language::Bash),
    ("shell-script", Language::Bash),
    ("console", Language::Bash),
    ("shell-session", Language::Bash),
    ("shellsession", Language::Bash),
    // Stylesheets
    ("css", Language::Css),
    ("scss", Language::Css),
    ("sass", Language::Css),
    ("less", Language::Css),
    ("postcss", Language::Css),
    // HTML
    ("html", Language::Html),
    ("htm", Language::Html),
    ("html5", Language::Html),
    ("xhtml", Language::Html),
    // JavaScript
    ("javascript", Language::Javascript),
    ("js", Language::Javascript),
    ("node", Language::Javascript),
    ("nodejs", Language::Javascript),
    ("mjs", Language::Javascript),
    ("cjs", Language::Javascript),
    ("ecmascript", Language::Javascript),
    ("es6", Language::Javascript),
    // JSON
    ("json", Language::Json),
    ("jsonc", Language::Json),
    ("json5", Language::Json),
    // JavaScript variants
    ("jsx", Language::Jsx),
    ("tsx", Language::Jsx),
    ("react", Language::Jsx),
    ("javascriptreact", Language::Jsx),
    ("typescriptreact", Language::Jsx),
    // TypeScript
    ("typescript", Language::Typescript),
    ("ts", Language::Typescript),
    ("mts", Language::Typescript),
    ("cts", Language::Typescript),
    ("unknown", Language::Unknown),
];

/// Extract the language tag from a fence info string.
///
/// Takes the first whitespace-separated word, unwraps Pandoc-style
/// `{.lang}` attributes and drops suffixes such as `{1,3}`, `,linenos`
/// or `:file.js`.
pub fn language_tag(info: &str) -> &str {
    let first = info.split_whitespace().next().unwrap_or("");
    let word = match first.strip_prefix('{') {
        Some(inner) => inner.trim_start_matches('.'),
        None => first,
    };
    let end = word.find(['{', '}', ',', ':']).unwrap_or(word.len());
    &word[..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AliasEntry {
    /// Length in characters of the alias as written, before case folding.
    key_len: usize,
    language: Language,
}

/// Resolver for language tags to the closed [`Language`] set.
#[derive(Debug, Clone)]
pub struct LanguageClassifier {
    /// Map from case-folded alias -> language
    aliases: HashMap<String, AliasEntry>,
}

impl LanguageClassifier {
    /// Create a classifier using only the built-in alias table.
    pub fn new() -> Self {
        Self::with_aliases(std::iter::empty::<(&str, Language)>())
    }

    /// Create a classifier with additional aliases layered over the built-ins.
    ///
    /// When two aliases fold to the same key, the longer one as written wins;
    /// on equal length the later one (user aliases over built-ins) wins.
    pub fn with_aliases<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = (S, Language)>,
        S: AsRef<str>,
    {
        let mut classifier = Self {
            aliases: HashMap::with_capacity(BUILTIN_ALIASES.len()),
        };
        for &(alias, language) in BUILTIN_ALIASES {
            classifier.insert(alias, language);
        }
        for (alias, language) in extra {
            classifier.insert(alias.as_ref(), language);
        }
        classifier
    }

    fn insert(&mut self, alias: &str, language: Language) {
        let alias = alias.trim();
        if alias.is_empty() {
            return;
        }
        let entry = AliasEntry {
            key_len: alias.chars().count(),
            language,
        };
        let key = alias.to_lowercase();
        match self.aliases.get(&key) {
            Some(existing) if existing.key_len > entry.key_len => {}
            _ => {
                self.aliases.insert(key, entry);
            }
        }
    }

    /// Classify a language tag. Empty or unrecognized tags are `Unknown`.
    pub fn classify(&self, tag: &str) -> Language {
        let tag = tag.trim();
        if tag.is_empty() {
            return Language::Unknown;
        }
        self.aliases
            .get(tag.to_lowercase().as_str())
            .map_or(Language::Unknown, |entry| entry.language)
    }

    pub fn classify_block<'a>(&self, block: CodeBlock<'a>) -> ClassifiedBlock<'a> {
        ClassifiedBlock {
            language: self.classify(block.tag),
            block,
        }
    }

    /// Check if a tag is in the alias table.
    pub fn is_known(&self, tag: &str) -> bool {
        self.aliases.contains_key(tag.trim().to_lowercase().as_str())
    }

    /// All aliases resolving to `language`, sorted.
    pub fn aliases_for(&self, language: Language) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, entry)| entry.language == language)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }
}

impl Default for LanguageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

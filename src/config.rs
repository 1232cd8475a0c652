//!
//! This module defines the configuration file format and its loading logic.
//! Configuration is read from `.fencescan.toml` in the scan root, or from an
//! explicit path. Command-line flags override anything set here.

use crate::code_blocks::{Language, LanguageClassifier};
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the scan root.
pub const CONFIG_FILE_NAME: &str = ".fencescan.toml";

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config file at {path}: {source}")]
    ParseError { source: toml::de::Error, path: String },

    /// A value parsed but is not acceptable
    #[error("Invalid value for '{key}' in {path}: {message}")]
    InvalidValue { key: String, path: String, message: String },
}

/// Represents the complete configuration loaded from .fencescan.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Glob patterns of files to include (relative to the scan root)
    pub include: Vec<String>,

    /// Glob patterns of files or directories to exclude
    pub exclude: Vec<String>,

    /// Respect .gitignore files when scanning directories
    pub respect_gitignore: bool,

    /// File extensions treated as Markdown (without the leading dot)
    pub extensions: Vec<String>,

    /// Worker threads (None = one per core)
    pub threads: Option<usize>,

    /// Exit with code 1 when malformed blocks or unreadable files are found
    pub fail_on_malformed: bool,

    /// Default report format
    pub output_format: Option<OutputFormat>,

    /// Extra language aliases, e.g. `mongosh = "javascript"`
    pub language_aliases: BTreeMap<String, Language>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            respect_gitignore: true,
            extensions: default_extensions(),
            threads: None,
            fail_on_malformed: false,
            output_format: None,
            language_aliases: BTreeMap::new(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string()]
}

impl Config {
    /// Parse configuration from TOML text. `path` is only used in errors.
    pub fn from_toml_str(content: &str, path: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content).map_err(|source| ConfigError::ParseError {
            source,
            path: path.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Load configuration from an explicit file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: path_str.clone(),
        })?;
        log::debug!("[fencescan-config] Loading config from {path_str}");
        Self::from_toml_str(&content, &path_str)
    }

    /// Look for `.fencescan.toml` in `root`. Returns `None` if there is none.
    pub fn discover(root: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let candidate = root.join(CONFIG_FILE_NAME);
        if !candidate.is_file() {
            log::debug!("[fencescan-config] No config file in {}", root.display());
            return Ok(None);
        }
        let config = Self::load(&candidate)?;
        Ok(Some((candidate, config)))
    }

    fn validate(&mut self, path: &str) -> Result<(), ConfigError> {
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "threads".to_string(),
                path: path.to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let extensions: Vec<String> = self
            .extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        if extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "extensions".to_string(),
                path: path.to_string(),
                message: "at least one extension is required".to_string(),
            });
        }
        self.extensions = extensions;

        if let Some(alias) = self.language_aliases.keys().find(|alias| alias.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "language-aliases".to_string(),
                path: path.to_string(),
                message: format!("alias '{alias}' is empty"),
            });
        }
        Ok(())
    }

    /// Build a classifier with this configuration's aliases layered on top.
    pub fn classifier(&self) -> LanguageClassifier {
        LanguageClassifier::with_aliases(self.language_aliases.iter().map(|(alias, lang)| (alias.as_str(), *lang)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.respect_gitignore);
        assert_eq!(config.extensions, vec!["md", "markdown"]);
        assert!(!config.fail_on_malformed);
        assert_eq!(config.threads, None);
        assert_eq!(config.output_format, None);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = Config::from_toml_str("", "test.toml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_config() {
        let content = r#"
include = ["docs/**"]
exclude = ["drafts"]
respect-gitignore = false
extensions = [".md", "mdx"]
threads = 4
fail-on-malformed = true
output-format = "text"

[language-aliases]
mongosh = "javascript"
vue = "html"
"#;
        let config = Config::from_toml_str(content, "test.toml").unwrap();
        assert_eq!(config.include, vec!["docs/**"]);
        assert_eq!(config.exclude, vec!["drafts"]);
        assert!(!config.respect_gitignore);
        assert_eq!(config.extensions, vec!["md", "mdx"]);
        assert_eq!(config.threads, Some(4));
        assert!(config.fail_on_malformed);
        assert_eq!(config.output_format, Some(OutputFormat::Text));
        assert_eq!(config.language_aliases.get("mongosh"), Some(&Language::Javascript));

        let classifier = config.classifier();
        assert_eq!(classifier.classify("Vue"), Language::Html);
        assert_eq!(classifier.classify("js"), Language::Javascript);
    }

    #[test]
    fn test_alias_to_unknown_language_is_rejected() {
        let content = "[language-aliases]\npy = \"python\"\n";
        let err = Config::from_toml_str(content, "test.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Config::from_toml_str("colour = true\n", "cfg.toml").unwrap_err();
        assert!(err.to_string().contains("cfg.toml"));
    }

    #[test]
    fn test_zero_threads_is_rejected() {
        let err = Config::from_toml_str("threads = 0\n", "cfg.toml").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "threads"));
    }

    #[test]
    fn test_empty_extensions_rejected() {
        let err = Config::from_toml_str("extensions = [\".\"]\n", "cfg.toml").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "extensions"));
    }

    #[test]
    fn test_discover() {
        let dir = tempdir().unwrap();
        assert!(Config::discover(dir.path()).unwrap().is_none());

        fs::write(dir.path().join(CONFIG_FILE_NAME), "threads = 2\n").unwrap();
        let (path, config) = Config::discover(dir.path()).unwrap().unwrap();
        assert!(path.ends_with(CONFIG_FILE_NAME));
        assert_eq!(config.threads, Some(2));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }
}

//! Handler for the `languages` command.

use fencescan_lib::exit_codes::{SUCCESS, TOOL_ERROR};
use fencescan_lib::{Language, LanguageClassifier};

/// Language metadata for JSON export
#[derive(serde::Serialize)]
struct LanguageInfo {
    /// Identifier used in reports (e.g., "javascript")
    name: &'static str,
    description: &'static str,
    /// Info-string tags that resolve to this language
    aliases: Vec<String>,
}

/// List every recognized language with its aliases.
pub fn handle_languages(format: &str) -> i32 {
    let classifier = LanguageClassifier::new();
    let infos: Vec<LanguageInfo> = Language::ALL
        .iter()
        .map(|&language| LanguageInfo {
            name: language.as_str(),
            description: language.description(),
            aliases: classifier
                .aliases_for(language)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect();

    if format == "json" {
        match serde_json::to_string_pretty(&infos) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize languages: {e}");
                return TOOL_ERROR;
            }
        }
        return SUCCESS;
    }

    println!("Recognized languages:");
    for info in &infos {
        println!("  {:<12} {}", info.name, info.description);
        if !info.aliases.is_empty() {
            println!("  {:<12} aliases: {}", "", info.aliases.join(", "));
        }
    }
    SUCCESS
}

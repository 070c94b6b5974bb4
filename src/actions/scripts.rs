//! Classification of `package.json` script names into action categories

use super::ActionCategory;

/// Keyword lists per category. A script lands in every category whose list
/// contains a substring of its (lowercased) name.
const SCRIPT_KEYWORDS: &[(ActionCategory, &[&str])] = &[
    (ActionCategory::Build, &["build", "compile", "dist", "bundle"]),
    (ActionCategory::Test, &["test", "spec", "e2e", "coverage"]),
    (ActionCategory::Dev, &["dev", "start", "serve", "watch"]),
    (ActionCategory::Lint, &["lint"]),
    (ActionCategory::Format, &["format", "fmt", "prettier"]),
    (ActionCategory::Deploy, &["deploy", "release", "publish"]),
    (ActionCategory::Clean, &["clean"]),
    (ActionCategory::Check, &["typecheck", "type-check"]),
];

/// Categories a script name belongs to, in keyword-table order
pub fn classify_script(script_name: &str) -> Vec<ActionCategory> {
    let name = script_name.to_lowercase();
    SCRIPT_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| name.contains(k)))
        .map(|(category, _)| category.clone())
        .collect()
}

//! Gitignore-style path filtering
//!
//! Rules are evaluated in order and the last matching rule decides, so a
//! later `!pattern` re-includes a path that an earlier rule excluded. This is
//! a subset of gitignore without `**` or anchoring.

use regex::Regex;
use std::path::Path;
use tracing::debug;

/// Directories that are never interesting when looking for targets
pub const DEFAULT_IGNORES: &[&str] = &[
    "node_modules",
    ".git",
    "build",
    "dist",
    "target",
    "venv",
    ".venv",
    "env",
    "vendor",
    "__pycache__",
    ".next",
    ".nuxt",
    "coverage",
    ".idea",
    ".vscode",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    ".gradle",
    "out",
    "tmp",
    ".cache",
];

#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pub pattern: String,
    pub is_negated: bool,
    pub directory_only: bool,
    wildcard: Option<Regex>,
}

impl IgnoreRule {
    /// Parse one gitignore line; `None` for blanks and comments
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (is_negated, rest) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let (directory_only, rest) = match rest.strip_suffix('/') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        let pattern = rest.trim_start_matches('/');
        if pattern.is_empty() {
            return None;
        }

        Some(Self {
            pattern: pattern.to_string(),
            is_negated,
            directory_only,
            wildcard: compile_wildcard(pattern),
        })
    }

    /// Does this rule match the `/`-separated relative `path`?
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        if path == self.pattern {
            return !self.directory_only || is_dir;
        }

        if self.pattern.contains('/') {
            return self.matches_with_slash(path, is_dir);
        }

        let segments: Vec<&str> = path.split('/').collect();
        let last = segments.len().saturating_sub(1);
        segments.iter().enumerate().any(|(i, segment)| {
            let is_directory_segment = i < last || is_dir;
            self.matches_segment(segment) && (!self.directory_only || is_directory_segment)
        })
    }

    fn matches_with_slash(&self, path: &str, is_dir: bool) -> bool {
        if let Some(wildcard) = &self.wildcard {
            return ancestors_and_self(path)
                .any(|(prefix, whole)| wildcard.is_match(prefix) && (!whole || !self.directory_only || is_dir));
        }

        if self.directory_only {
            let inside = path.starts_with(&format!("{}/", self.pattern));
            return inside || (is_dir && path.contains(&self.pattern));
        }

        path.contains(&self.pattern)
    }

    fn matches_segment(&self, segment: &str) -> bool {
        match &self.wildcard {
            Some(wildcard) => wildcard.is_match(segment),
            None => segment == self.pattern,
        }
    }
}

/// Every `/`-bounded prefix of `path`, flagged when the prefix is the whole path
fn ancestors_and_self(path: &str) -> impl Iterator<Item = (&str, bool)> {
    path.match_indices('/')
        .map(move |(i, _)| (&path[..i], false))
        .chain(std::iter::once((path, true)))
}

fn compile_wildcard(pattern: &str) -> Option<Regex> {
    if !pattern.contains('*') && !pattern.contains('?') {
        return None;
    }

    let mut regex = String::from("^");
    for ch in pattern.chars() {
        match ch {
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex.push('$');
    Regex::new(&regex).ok()
}

/// Ordered rule list: defaults, then extra patterns, then gitignore lines
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    /// Matcher with only the built-in defaults
    pub fn with_defaults() -> Self {
        let mut matcher = Self::default();
        matcher.add_lines(DEFAULT_IGNORES.iter().copied());
        matcher
    }

    /// Defaults, `extra` patterns, then the repository's `.gitignore` and
    /// `.git/info/exclude`. Missing or unreadable files are skipped.
    pub fn for_repository(root: &Path, extra: &[String]) -> Self {
        let mut matcher = Self::with_defaults();
        matcher.add_lines(extra.iter().map(String::as_str));

        for file in [".gitignore", ".git/info/exclude"] {
            let path = root.join(file);
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    let before = matcher.rules.len();
                    matcher.add_lines(content.lines());
                    debug!(
                        file = %path.display(),
                        rules = matcher.rules.len() - before,
                        "Loaded ignore rules"
                    );
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => debug!(file = %path.display(), error = %err, "Skipping ignore file"),
            }
        }

        matcher
    }

    pub fn add_lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        self.rules.extend(lines.into_iter().filter_map(IgnoreRule::parse));
    }

    /// Last-match-wins decision for a `/`-separated repo-relative path
    pub fn should_ignore(&self, path: &str, is_dir: bool) -> bool {
        let path = path.trim_start_matches("./").trim_matches('/');
        if path.is_empty() {
            return false;
        }

        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(path, is_dir))
            .map(|rule| !rule.is_negated)
            .unwrap_or(false)
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }
}

//! Python import graph, restricted to modules that live inside the repository

use crate::manifest::relative_path;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq)]
struct ImportStatement {
    /// Number of leading dots; 0 for absolute imports
    level: usize,
    module: String,
    names: Vec<String>,
}

fn parse_imports(source: &str) -> Vec<ImportStatement> {
    let (Ok(plain), Ok(from)) = (
        Regex::new(r"^\s*import\s+(.+)$"),
        Regex::new(r"^\s*from\s+(\.*)([\w.]*)\s+import\s+(.+)$"),
    ) else {
        return Vec::new();
    };

    let mut statements = Vec::new();
    for line in source.lines() {
        let line = line.split('#').next().unwrap_or_default();

        if let Some(caps) = from.captures(line) {
            let names = split_names(&caps[3]);
            statements.push(ImportStatement {
                level: caps[1].len(),
                module: caps[2].to_string(),
                names,
            });
        } else if let Some(caps) = plain.captures(line) {
            statements.extend(split_names(&caps[1]).into_iter().map(|module| ImportStatement {
                level: 0,
                module,
                names: Vec::new(),
            }));
        }
    }
    statements
}

/// `a as b, (c, d` -> `[a, c, d]`
fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(|part| part.trim().trim_matches(|c| c == '(' || c == ')' || c == '\\').trim())
        .filter_map(|part| part.split_whitespace().next())
        .filter(|name| *name != "*" && !name.is_empty())
        .map(String::from)
        .collect()
}

/// `base/a/b.py` or `base/a/b/__init__.py` for dotted `a.b`
fn module_file(base: &Path, dotted: &str) -> Option<PathBuf> {
    if dotted.is_empty() {
        return None;
    }
    let rel: PathBuf = dotted.split('.').collect();
    [rel.with_extension("py"), rel.join("__init__.py")]
        .into_iter()
        .map(|candidate| base.join(candidate))
        .find(|candidate| candidate.is_file())
}

/// Repo-relative paths of in-repository modules imported by `file`.
///
/// Absolute imports are tried against the importing file's directory and
/// then the repository root; relative imports climb one directory per extra
/// dot but never above the root. Anything unresolved is external and omitted.
pub fn resolve_python_imports(repo_root: &Path, file: &Path) -> Vec<String> {
    let Ok(source) = std::fs::read_to_string(file) else {
        return Vec::new();
    };
    let file_dir = file.parent().unwrap_or(repo_root);

    let mut resolved = BTreeSet::new();
    for statement in parse_imports(&source) {
        let bases: Vec<&Path> = if statement.level == 0 {
            vec![file_dir, repo_root]
        } else {
            let mut base = file_dir;
            for _ in 1..statement.level {
                match base.parent() {
                    Some(parent) if parent.starts_with(repo_root) => base = parent,
                    _ => break,
                }
            }
            vec![base]
        };

        for base in bases {
            let mut candidates = vec![statement.module.clone()];
            candidates.extend(statement.names.iter().map(|name| {
                if statement.module.is_empty() {
                    name.clone()
                } else {
                    format!("{}.{}", statement.module, name)
                }
            }));

            let found: Vec<PathBuf> = candidates
                .iter()
                .filter_map(|dotted| module_file(base, dotted))
                .collect();
            if !found.is_empty() {
                resolved.extend(found);
                break;
            }
        }
    }

    resolved
        .into_iter()
        .filter(|path| path != file)
        .map(|path| relative_path(repo_root, &path))
        .collect()
}

//! Target specifier resolution
//!
//! Specifier forms, tried in order:
//!
//! | form              | matches                                           |
//! |-------------------|---------------------------------------------------|
//! | `path:name`       | the exact address                                 |
//! | `//path[:name]`   | a target by repo-absolute path or address         |
//! | `path`            | a target located in that directory                |
//! | `:name`           | a target named `name` in the current directory    |
//! | `name`            | a target with that name anywhere                  |
//!
//! Every rule is checked against all targets before the next rule runs. The
//! first match in address order wins, whatever its target type.

use super::{TargetInfo, TargetMap, TargetType};
use crate::error::{Error, Result};
use tracing::debug;

struct Specifier<'a> {
    raw: &'a str,
    /// `raw` without a leading `./`
    normalized: &'a str,
}

type Rule = fn(&Specifier<'_>, &str, &TargetInfo) -> bool;

const RULES: &[(&str, Rule)] = &[
    ("exact-address", exact_address),
    ("repo-absolute", repo_absolute),
    ("directory", directory),
    ("current-directory-name", current_directory_name),
    ("bare-name", bare_name),
];

fn exact_address(spec: &Specifier<'_>, _cwd: &str, target: &TargetInfo) -> bool {
    let address = target.address();
    address == spec.raw || address == spec.normalized
}

fn repo_absolute(spec: &Specifier<'_>, _cwd: &str, target: &TargetInfo) -> bool {
    let Some(rest) = spec.raw.strip_prefix("//") else {
        return false;
    };
    let address = target.address();
    target.path == rest || address == format!("{}:{}", rest, target.name) || address == rest
}

fn directory(spec: &Specifier<'_>, _cwd: &str, target: &TargetInfo) -> bool {
    !target.is_root() && target.path == spec.normalized
}

fn current_directory_name(spec: &Specifier<'_>, cwd: &str, target: &TargetInfo) -> bool {
    spec.raw
        .strip_prefix(':')
        .map_or(false, |name| target.path == cwd && target.name == name)
}

fn bare_name(spec: &Specifier<'_>, _cwd: &str, target: &TargetInfo) -> bool {
    !spec.raw.contains('/') && !spec.raw.contains(':') && target.name == spec.raw
}

/// Pick the package target among `candidates`, else the first one.
/// Only used when no specifier is given.
fn prefer_package<'t>(candidates: impl Iterator<Item = &'t TargetInfo>) -> Option<&'t TargetInfo> {
    let mut first_script = None;
    for target in candidates {
        if target.target_type == TargetType::Package {
            return Some(target);
        }
        first_script.get_or_insert(target);
    }
    first_script
}

/// Resolve `specifier` relative to `cwd` (repo-relative, empty for the root).
///
/// With no specifier the target in `cwd` is used, then a root target, then
/// the first target in address order.
pub fn resolve<'t>(
    specifier: Option<&str>,
    cwd: &str,
    targets: &'t TargetMap,
) -> Result<&'t TargetInfo> {
    let found = match specifier.map(str::trim).filter(|s| !s.is_empty()) {
        None => resolve_default(cwd, targets),
        Some(raw) => resolve_specifier(raw, cwd, targets),
    };

    found.ok_or_else(|| Error::TargetNotFound {
        specifier: specifier.unwrap_or_default().to_string(),
        available: targets.keys().cloned().collect(),
    })
}

fn resolve_default<'t>(cwd: &str, targets: &'t TargetMap) -> Option<&'t TargetInfo> {
    prefer_package(targets.values().filter(|t| t.path == cwd))
        .or_else(|| {
            targets
                .iter()
                .find(|(address, _)| address.starts_with(':'))
                .map(|(_, target)| target)
        })
        .or_else(|| targets.values().next())
}

fn resolve_specifier<'t>(raw: &str, cwd: &str, targets: &'t TargetMap) -> Option<&'t TargetInfo> {
    let spec = Specifier {
        raw,
        normalized: raw.strip_prefix("./").unwrap_or(raw),
    };

    for &(rule, matches) in RULES {
        if let Some(target) = targets.values().find(|t| matches(&spec, cwd, *t)) {
            debug!(specifier = raw, rule, address = %target.address(), "Resolved target");
            return Some(target);
        }
    }

    // `//name` may refer to a root target by name
    let rest = raw.strip_prefix("//")?.trim_start_matches(':');
    let target = targets
        .iter()
        .find(|(address, target)| address.starts_with(':') && target.name == rest)
        .map(|(_, target)| target)?;
    debug!(specifier = raw, rule = "repo-root-name", address = %target.address(), "Resolved target");
    Some(target)
}

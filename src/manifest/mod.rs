//! Manifest analysis
//!
//! Turns one recognized manifest into a [`PackageInfo`]: the declared name,
//! version, language, framework and package manager of the package living in
//! that directory. `package.json` is fully parsed; every other manifest is
//! read with targeted regex extraction where the first match wins.

pub mod framework;
mod jvm;
mod node;
pub mod package_manager;
mod python;
mod simple;

use crate::error::{Error, Result};
use crate::stack::{Ecosystem, LanguageId, PackageManagerId};
use regex::Regex;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Script name to command line, in `package.json` order
pub type ScriptTable = IndexMap<String, String>;

/// Intermediate record for one discovered manifest
#[derive(Debug, Clone, PartialEq)]
pub struct PackageInfo {
    /// Directory containing the manifest
    pub absolute_path: PathBuf,
    /// Directory relative to the repository root, `/`-separated, empty for the root
    pub repo_relative_path: String,
    pub ecosystem: Ecosystem,
    /// Manifest file name, e.g. `package.json`
    pub manifest_file: String,
    pub declared_name: Option<String>,
    pub version: Option<String>,
    pub language: LanguageId,
    pub framework: Option<String>,
    pub package_manager: Option<PackageManagerId>,
    /// `package.json` scripts (name to command line) in declaration order; empty elsewhere
    pub scripts: ScriptTable,
}

impl PackageInfo {
    /// Declared name, falling back to the directory name
    pub fn name(&self) -> String {
        self.declared_name
            .clone()
            .unwrap_or_else(|| directory_name(&self.absolute_path))
    }

    pub fn is_root(&self) -> bool {
        self.repo_relative_path.is_empty()
    }
}

/// Fields extracted from a single manifest
#[derive(Debug, Default)]
pub(crate) struct ManifestDetails {
    pub name: Option<String>,
    pub version: Option<String>,
    pub language: Option<LanguageId>,
    pub framework: Option<String>,
    pub package_manager: Option<PackageManagerId>,
    pub scripts: ScriptTable,
}

/// Analyze `manifest_file` inside `dir`.
///
/// Returns [`Error::Io`] when the manifest cannot be read and
/// [`Error::ManifestParse`] when a fully-parsed manifest is malformed.
pub fn analyze(repo_root: &Path, dir: &Path, manifest_file: &str) -> Result<PackageInfo> {
    let ecosystem = Ecosystem::from_manifest(manifest_file).ok_or_else(|| {
        Error::parse(dir.join(manifest_file), "unrecognized manifest file name")
    })?;
    let manifest_path = dir.join(manifest_file);
    let content =
        std::fs::read_to_string(&manifest_path).map_err(|e| Error::io(&manifest_path, e))?;

    let details = match ecosystem {
        Ecosystem::Node => node::analyze(repo_root, dir, &manifest_path, &content)?,
        Ecosystem::Rust => simple::analyze_cargo(&content),
        Ecosystem::Go => simple::analyze_go_mod(&content),
        Ecosystem::JavaMaven => jvm::analyze_pom(&content),
        Ecosystem::JavaGradle => jvm::analyze_gradle(dir, &content),
        Ecosystem::Php => simple::analyze_composer(&content),
        Ecosystem::Ruby => simple::analyze_gemfile(&content),
        Ecosystem::Python => python::analyze(manifest_file, &content),
    };

    let package = PackageInfo {
        absolute_path: dir.to_path_buf(),
        repo_relative_path: relative_path(repo_root, dir),
        ecosystem,
        manifest_file: manifest_file.to_string(),
        declared_name: details.name.or_else(|| root_fallback_name(repo_root, dir)),
        version: details.version,
        language: details
            .language
            .unwrap_or_else(|| ecosystem.default_language()),
        framework: details.framework,
        package_manager: details.package_manager,
        scripts: details.scripts,
    };

    debug!(
        manifest = %manifest_path.display(),
        name = ?package.declared_name,
        language = %package.language,
        framework = ?package.framework,
        "Analyzed manifest"
    );

    Ok(package)
}

/// `dir` relative to `root` with `/` separators; empty for the root itself
pub fn relative_path(root: &Path, dir: &Path) -> String {
    dir.strip_prefix(root)
        .map(|rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}

pub(crate) fn directory_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string())
}

fn root_fallback_name(repo_root: &Path, dir: &Path) -> Option<String> {
    if dir == repo_root {
        Some(directory_name(repo_root))
    } else {
        None
    }
}

/// First capture group of `pattern` in `content`
pub(crate) fn capture_first(pattern: &str, content: &str) -> Option<String> {
    Regex::new(pattern)
        .ok()?
        .captures(content)?
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

//! `package.json` analysis

use super::{framework, package_manager, ManifestDetails};
use crate::error::{Error, Result};
use crate::stack::LanguageId;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    scripts: IndexMap<String, Value>,
    #[serde(default)]
    dependencies: BTreeMap<String, Value>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, Value>,
}

pub(super) fn analyze(
    repo_root: &Path,
    dir: &Path,
    manifest_path: &Path,
    content: &str,
) -> Result<ManifestDetails> {
    let manifest: PackageJson =
        serde_json::from_str(content).map_err(|e| Error::parse(manifest_path, e))?;

    let dependency_names: Vec<&str> = manifest
        .dependencies
        .keys()
        .chain(manifest.dev_dependencies.keys())
        .map(String::as_str)
        .collect();

    let language = if dir.join("tsconfig.json").is_file()
        || dependency_names.contains(&"typescript")
    {
        LanguageId::TypeScript
    } else {
        LanguageId::JavaScript
    };

    let scripts = manifest
        .scripts
        .into_iter()
        .filter_map(|(name, command)| command.as_str().map(|c| (name, c.to_string())))
        .collect();

    Ok(ManifestDetails {
        name: manifest.name.filter(|n| !n.trim().is_empty()),
        version: manifest.version,
        language: Some(language),
        framework: framework::detect_node(&dependency_names),
        package_manager: Some(package_manager::detect_node(repo_root, dir)),
        scripts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::PackageManagerId;
    use std::fs;
    use tempfile::TempDir;

    fn analyze_str(dir: &Path, content: &str) -> Result<ManifestDetails> {
        analyze(dir, dir, &dir.join("package.json"), content)
    }

    #[test]
    fn test_plain_javascript_package() {
        let dir = TempDir::new().unwrap();
        let details = analyze_str(
            dir.path(),
            r#"{"name":"app","version":"1.2.0","scripts":{"build":"webpack","test":"jest"}}"#,
        )
        .unwrap();

        assert_eq!(details.name.as_deref(), Some("app"));
        assert_eq!(details.version.as_deref(), Some("1.2.0"));
        assert_eq!(details.language, Some(LanguageId::JavaScript));
        assert_eq!(details.package_manager, Some(PackageManagerId::Npm));
        assert_eq!(details.scripts.get("build").map(String::as_str), Some("webpack"));
        assert_eq!(details.scripts.len(), 2);
    }

    #[test]
    fn test_scripts_keep_file_order() {
        let dir = TempDir::new().unwrap();
        let details = analyze_str(
            dir.path(),
            r#"{"name":"app","scripts":{"compile":"tsc","build":"webpack","ci":"jest"}}"#,
        )
        .unwrap();
        let names: Vec<&str> = details.scripts.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["compile", "build", "ci"]);
    }

    #[test]
    fn test_tsconfig_means_typescript() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tsconfig.json"), "{}").unwrap();
        let details = analyze_str(dir.path(), r#"{"name":"web"}"#).unwrap();
        assert_eq!(details.language, Some(LanguageId::TypeScript));
    }

    #[test]
    fn test_typescript_dependency_means_typescript() {
        let dir = TempDir::new().unwrap();
        let details = analyze_str(
            dir.path(),
            r#"{"name":"web","devDependencies":{"typescript":"^5.0.0"}}"#,
        )
        .unwrap();
        assert_eq!(details.language, Some(LanguageId::TypeScript));
    }

    #[test]
    fn test_framework_from_dev_dependencies() {
        let dir = TempDir::new().unwrap();
        let details = analyze_str(
            dir.path(),
            r#"{"name":"web","dependencies":{"react":"18"},"devDependencies":{"next":"14"}}"#,
        )
        .unwrap();
        assert_eq!(details.framework.as_deref(), Some("Next.js"));
    }

    #[test]
    fn test_non_string_scripts_are_skipped() {
        let dir = TempDir::new().unwrap();
        let details =
            analyze_str(dir.path(), r#"{"name":"x","scripts":{"ok":"node .","bad":42}}"#).unwrap();
        assert_eq!(details.scripts.len(), 1);
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let dir = TempDir::new().unwrap();
        let err = analyze_str(dir.path(), "{not json").unwrap_err();
        assert!(err.to_string().contains("package.json"));
    }
}

//! Regex-based analyzers for Cargo, Go, Composer and Bundler manifests

use super::{capture_first, framework, ManifestDetails};
use crate::stack::{Ecosystem, PackageManagerId};

pub(super) fn analyze_cargo(content: &str) -> ManifestDetails {
    ManifestDetails {
        name: capture_first(r#"(?m)^\s*name\s*=\s*"([^"]+)""#, content),
        version: capture_first(r#"(?m)^\s*version\s*=\s*"([^"]+)""#, content),
        framework: framework::detect_in_content(Ecosystem::Rust, content),
        package_manager: Some(PackageManagerId::Cargo),
        ..Default::default()
    }
}

pub(super) fn analyze_go_mod(content: &str) -> ManifestDetails {
    let name = capture_first(r"(?m)^\s*module\s+(\S+)", content).map(|module| module_name(&module));

    ManifestDetails {
        name,
        framework: framework::detect_in_content(Ecosystem::Go, content),
        package_manager: Some(PackageManagerId::Go),
        ..Default::default()
    }
}

/// Last meaningful segment of a Go module path (`example.com/x/auth/v2` -> `auth`)
fn module_name(module: &str) -> String {
    let segments: Vec<&str> = module.trim_matches('"').split('/').collect();
    let is_major_suffix = |s: &str| {
        s.len() > 1 && s.starts_with('v') && s[1..].chars().all(|c| c.is_ascii_digit())
    };

    match segments.as_slice() {
        [.., parent, last] if is_major_suffix(*last) => parent.to_string(),
        [.., last] => last.to_string(),
        [] => module.to_string(),
    }
}

pub(super) fn analyze_composer(content: &str) -> ManifestDetails {
    let name = capture_first(r#""name"\s*:\s*"([^"]+)""#, content)
        .map(|full| full.rsplit('/').next().unwrap_or_default().to_string());

    ManifestDetails {
        name,
        version: capture_first(r#""version"\s*:\s*"([^"]+)""#, content),
        framework: framework::detect_in_content(Ecosystem::Php, content),
        package_manager: Some(PackageManagerId::Composer),
        ..Default::default()
    }
}

pub(super) fn analyze_gemfile(content: &str) -> ManifestDetails {
    ManifestDetails {
        framework: framework::detect_in_content(Ecosystem::Ruby, content),
        package_manager: Some(PackageManagerId::Bundler),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cargo_package() {
        let details = analyze_cargo(
            "[package]\nname = \"api\"\nversion = \"0.4.0\"\n\n[dependencies]\naxum = \"0.7\"\n",
        );
        assert_eq!(details.name.as_deref(), Some("api"));
        assert_eq!(details.version.as_deref(), Some("0.4.0"));
        assert_eq!(details.framework.as_deref(), Some("Axum"));
    }

    #[test]
    fn test_cargo_virtual_workspace_has_no_name() {
        let details = analyze_cargo("[workspace]\nmembers = [\"crates/*\"]\n");
        assert_eq!(details.name, None);
    }

    #[test]
    fn test_go_module_names() {
        assert_eq!(module_name("github.com/x/auth"), "auth");
        assert_eq!(module_name("github.com/x/auth/v2"), "auth");
        assert_eq!(module_name("tool"), "tool");
    }

    #[test]
    fn test_go_mod() {
        let details = analyze_go_mod("module github.com/x/auth\n\ngo 1.22\n");
        assert_eq!(details.name.as_deref(), Some("auth"));
        assert_eq!(details.package_manager, Some(PackageManagerId::Go));
    }

    #[test]
    fn test_composer_vendor_prefix_stripped() {
        let details = analyze_composer(
            r#"{"name": "acme/shop", "version": "2.0.1", "require": {"laravel/framework": "^10"}}"#,
        );
        assert_eq!(details.name.as_deref(), Some("shop"));
        assert_eq!(details.version.as_deref(), Some("2.0.1"));
        assert_eq!(details.framework.as_deref(), Some("Laravel"));
    }
}

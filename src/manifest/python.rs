//! Python manifests: pyproject.toml, setup.py, requirements.txt, Pipfile

use super::{capture_first, framework, ManifestDetails};
use crate::stack::{Ecosystem, PackageManagerId};

pub(super) fn analyze(manifest_file: &str, content: &str) -> ManifestDetails {
    let (name, version) = match manifest_file {
        "pyproject.toml" => (
            capture_first(r#"(?m)^\s*name\s*=\s*["']([^"']+)["']"#, content),
            capture_first(r#"(?m)^\s*version\s*=\s*["']([^"']+)["']"#, content),
        ),
        "setup.py" => (
            capture_first(r#"name\s*=\s*["']([^"']+)["']"#, content),
            capture_first(r#"version\s*=\s*["']([^"']+)["']"#, content),
        ),
        _ => (None, None),
    };

    let package_manager = match manifest_file {
        "Pipfile" => PackageManagerId::Pipenv,
        "pyproject.toml" if content.contains("[tool.poetry]") => PackageManagerId::Poetry,
        _ => PackageManagerId::Pip,
    };

    ManifestDetails {
        name,
        version,
        framework: framework::detect_in_content(Ecosystem::Python, content),
        package_manager: Some(package_manager),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pyproject() {
        let details = analyze(
            "pyproject.toml",
            "[project]\nname = \"ingest\"\nversion = \"0.2.0\"\ndependencies = [\"fastapi\"]\n",
        );
        assert_eq!(details.name.as_deref(), Some("ingest"));
        assert_eq!(details.version.as_deref(), Some("0.2.0"));
        assert_eq!(details.framework.as_deref(), Some("FastAPI"));
        assert_eq!(details.package_manager, Some(PackageManagerId::Pip));
    }

    #[test]
    fn test_poetry_project() {
        let details = analyze(
            "pyproject.toml",
            "[tool.poetry]\nname = \"svc\"\nversion = \"1.0.0\"\n",
        );
        assert_eq!(details.package_manager, Some(PackageManagerId::Poetry));
    }

    #[test]
    fn test_setup_py() {
        let details = analyze(
            "setup.py",
            "from setuptools import setup\nsetup(name='etl', version='3.1')\n",
        );
        assert_eq!(details.name.as_deref(), Some("etl"));
        assert_eq!(details.version.as_deref(), Some("3.1"));
    }

    #[test]
    fn test_requirements_has_no_name() {
        let details = analyze("requirements.txt", "flask==3.0\n");
        assert_eq!(details.name, None);
        assert_eq!(details.framework.as_deref(), Some("Flask"));
    }

    #[test]
    fn test_pipfile_uses_pipenv() {
        let details = analyze("Pipfile", "[packages]\nrequests = \"*\"\n");
        assert_eq!(details.package_manager, Some(PackageManagerId::Pipenv));
    }
}

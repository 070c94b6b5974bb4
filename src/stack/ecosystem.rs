//! Ecosystems and the manifests that identify them

use super::LanguageId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Manifest files probed in every directory, in priority order.
///
/// Non-Python manifests are mutually exclusive within one directory (the
/// first hit wins); Python manifests are all collected.
pub const MANIFEST_PRIORITY: &[&str] = &[
    "package.json",
    "Cargo.toml",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "composer.json",
    "Gemfile",
    "pyproject.toml",
    "setup.py",
    "requirements.txt",
    "Pipfile",
];

/// Language / package-manager pairing a manifest belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ecosystem {
    Node,
    Rust,
    Go,
    JavaMaven,
    JavaGradle,
    Php,
    Ruby,
    Python,
}

impl Ecosystem {
    pub fn from_manifest(file_name: &str) -> Option<Self> {
        match file_name {
            "package.json" => Some(Self::Node),
            "Cargo.toml" => Some(Self::Rust),
            "go.mod" => Some(Self::Go),
            "pom.xml" => Some(Self::JavaMaven),
            "build.gradle" | "build.gradle.kts" => Some(Self::JavaGradle),
            "composer.json" => Some(Self::Php),
            "Gemfile" => Some(Self::Ruby),
            "pyproject.toml" | "setup.py" | "requirements.txt" | "Pipfile" => Some(Self::Python),
            _ => None,
        }
    }

    pub fn is_python(self) -> bool {
        self == Self::Python
    }

    /// Language for ecosystems with a single language; Node is refined by the analyzer
    pub fn default_language(self) -> LanguageId {
        match self {
            Self::Node => LanguageId::JavaScript,
            Self::Rust => LanguageId::Rust,
            Self::Go => LanguageId::Go,
            Self::JavaMaven | Self::JavaGradle => LanguageId::Java,
            Self::Php => LanguageId::Php,
            Self::Ruby => LanguageId::Ruby,
            Self::Python => LanguageId::Python,
        }
    }

    /// Candidate dependency files, checked for existence by the target builder
    pub fn dependency_files(self) -> &'static [&'static str] {
        match self {
            Self::Node => &[
                "package.json",
                "package-lock.json",
                "yarn.lock",
                "pnpm-lock.yaml",
                "bun.lockb",
                "bun.lock",
            ],
            Self::Rust => &["Cargo.toml", "Cargo.lock"],
            Self::Go => &["go.mod", "go.sum"],
            Self::JavaMaven => &["pom.xml"],
            Self::JavaGradle => &[
                "build.gradle",
                "build.gradle.kts",
                "settings.gradle",
                "settings.gradle.kts",
                "gradle.properties",
            ],
            Self::Php => &["composer.json", "composer.lock"],
            Self::Ruby => &["Gemfile", "Gemfile.lock"],
            Self::Python => &[
                "requirements.txt",
                "pyproject.toml",
                "Pipfile",
                "setup.py",
                "setup.cfg",
                "poetry.lock",
                "Pipfile.lock",
            ],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::JavaMaven => "java-maven",
            Self::JavaGradle => "java-gradle",
            Self::Php => "php",
            Self::Ruby => "ruby",
            Self::Python => "python",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

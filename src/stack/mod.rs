//! Identifiers shared across scanning, synthesis and execution
//!
//! Languages, package managers and ecosystems are first-class values here so
//! that the manifest analyzers and the action synthesizer agree on naming.

pub mod id_enum_macro;
pub mod ecosystem;

pub use ecosystem::Ecosystem;

crate::define_id_enum! {
    /// Source language of a target
    LanguageId {
        JavaScript => "javascript" | "js" | "node",
        TypeScript => "typescript" | "ts",
        Rust => "rust",
        Go => "go" | "golang",
        Java => "java",
        Php => "php",
        Ruby => "ruby",
        Python => "python" | "py",
    }
}

crate::define_id_enum! {
    /// Tool that installs dependencies and runs scripts for a target
    PackageManagerId {
        Npm => "npm",
        Yarn => "yarn",
        Pnpm => "pnpm",
        Bun => "bun",
        Cargo => "cargo",
        Go => "go",
        Maven => "maven" | "mvn",
        Gradle => "gradle",
        Composer => "composer",
        Bundler => "bundler" | "bundle",
        Pip => "pip",
        Pipenv => "pipenv",
        Poetry => "poetry",
    }
}

impl PackageManagerId {
    /// Executable used for `<runner> run <script>` style invocations
    pub fn runner(&self) -> &str {
        match self {
            Self::Maven => "mvn",
            Self::Bundler => "bundle",
            other => other.as_str(),
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Self::Npm | Self::Yarn | Self::Pnpm | Self::Bun)
    }
}

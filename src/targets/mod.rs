//! Targets and the project model
//!
//! A [`TargetInfo`] is one buildable/runnable unit. Targets are keyed by
//! their address `<repo-relative-path>:<name>`; the repository root uses an
//! empty path, so its package is addressed as `:name`.

pub mod builder;
mod entrypoint;
mod imports;
pub mod resolver;

pub use builder::TargetBuilder;
pub use resolver::resolve;

use crate::actions::ActionPipeline;
use crate::stack::LanguageId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Address -> target, iterated in address order
pub type TargetMap = BTreeMap<String, TargetInfo>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Package,
    Script,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub name: String,
    /// Directory relative to the repository root; empty for the root
    pub path: String,
    pub language: LanguageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,
    /// Existing dependency files, repo-relative
    #[serde(default)]
    pub dependency_files: Vec<String>,
    /// `.env` / `.env.local` in the target's package directory, repo-relative
    #[serde(default)]
    pub env_files: Vec<String>,
    /// Repo-relative entrypoint file for script targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    pub target_type: TargetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_dependencies: Option<Vec<String>>,
    pub actions: ActionPipeline,
}

impl TargetInfo {
    pub fn address(&self) -> String {
        format_address(&self.path, &self.name)
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}

pub fn format_address(path: &str, name: &str) -> String {
    format!("{}:{}", path, name)
}

/// Result of analyzing a repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    pub name: String,
    pub targets: TargetMap,
    /// Address -> repo-relative files the target imports from inside the repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_dependencies: Option<BTreeMap<String, Vec<String>>>,
}

impl ProjectContext {
    pub fn addresses(&self) -> Vec<String> {
        self.targets.keys().cloned().collect()
    }

    pub fn get(&self, address: &str) -> Option<&TargetInfo> {
        self.targets.get(address)
    }
}

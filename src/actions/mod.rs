//! Action pipelines
//!
//! Every target carries an [`ActionPipeline`]: a mapping from an
//! [`ActionCategory`] to the ordered commands that implement it. A category
//! with no commands is a no-op, never an error.

pub mod scripts;
pub mod synthesizer;

pub use synthesizer::synthesize;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

crate::define_id_enum! {
    /// Pipeline stage a command belongs to
    ActionCategory {
        Build => "build" | "compile",
        Test => "test",
        Deploy => "deploy",
        Dev => "dev" | "run" | "start" | "serve",
        Lint => "lint",
        Format => "format" | "fmt",
        Install => "install",
        Clean => "clean",
        Check => "check" | "typecheck",
        Add => "add",
    }
}

impl ActionCategory {
    /// Category used for uninstalling a dependency
    pub fn remove() -> Self {
        Self::Custom("remove".to_string())
    }

    /// Categories whose `flags` are conditional (dev-dependency flags) rather
    /// than always appended
    pub fn edits_dependencies(&self) -> bool {
        matches!(self, Self::Add) || self.as_str() == "remove"
    }
}

/// A single command within a pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

impl Action {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            flags: Vec::new(),
        }
    }

    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Whitespace-split program and arguments
    pub fn tokens(&self) -> Vec<String> {
        self.command.split_whitespace().map(String::from).collect()
    }
}

/// Category to ordered command list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionPipeline {
    stages: BTreeMap<ActionCategory, Vec<Action>>,
}

impl ActionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands for `category`; empty when the category is absent
    pub fn get(&self, category: &ActionCategory) -> &[Action] {
        self.stages
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn push(&mut self, category: ActionCategory, action: Action) {
        self.stages.entry(category).or_default().push(action);
    }

    /// Replaces every command of `category`
    pub fn set(&mut self, category: ActionCategory, actions: Vec<Action>) {
        self.stages.insert(category, actions);
    }

    /// Categories holding at least one action, in category order
    pub fn categories(&self) -> impl Iterator<Item = &ActionCategory> {
        self.stages
            .iter()
            .filter(|(_, actions)| !actions.is_empty())
            .map(|(category, _)| category)
    }

    pub fn is_empty(&self) -> bool {
        self.stages.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_category_is_empty() {
        let pipeline = ActionPipeline::new();
        assert!(pipeline.get(&ActionCategory::Build).is_empty());
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_push_preserves_order() {
        let mut pipeline = ActionPipeline::new();
        pipeline.push(ActionCategory::Build, Action::new("tsc"));
        pipeline.push(ActionCategory::Build, Action::new("npm run build"));

        let commands: Vec<&str> = pipeline
            .get(&ActionCategory::Build)
            .iter()
            .map(|a| a.command.as_str())
            .collect();
        assert_eq!(commands, vec!["tsc", "npm run build"]);
    }

    #[test]
    fn test_category_aliases_and_custom() {
        assert_eq!(ActionCategory::from_name("run"), Some(ActionCategory::Dev));
        assert_eq!(ActionCategory::from_name("fmt"), Some(ActionCategory::Format));
        assert_eq!(
            ActionCategory::parse_or_custom("storybook"),
            ActionCategory::Custom("storybook".to_string())
        );
        assert!(ActionCategory::remove().edits_dependencies());
        assert!(ActionCategory::Add.edits_dependencies());
        assert!(!ActionCategory::Build.edits_dependencies());
    }

    #[test]
    fn test_pipeline_serializes_as_map() {
        let mut pipeline = ActionPipeline::new();
        pipeline.push(ActionCategory::Build, Action::new("cargo build"));
        pipeline.push(
            ActionCategory::Add,
            Action::new("cargo add").with_flags(["--dev"]),
        );

        let json = serde_json::to_value(&pipeline).unwrap();
        assert_eq!(json["build"][0]["command"], "cargo build");
        assert!(json["build"][0].get("flags").is_none());
        assert_eq!(json["add"][0]["flags"][0], "--dev");

        let back: ActionPipeline = serde_json::from_value(json).unwrap();
        assert_eq!(back, pipeline);
    }

    #[test]
    fn test_tokens_split_on_whitespace() {
        let action = Action::new("go  build ./...");
        assert_eq!(action.tokens(), vec!["go", "build", "./..."]);
    }
}

//! Command execution for resolved targets
//!
//! Running an action means running the target's `install` commands, then its
//! `check` commands, then the requested action's commands, strictly in that
//! order. The first failure stops the pipeline.

mod options;
mod process;

pub use options::{AddOptions, ExecuteOptions, OutputCallback, OutputLevel, RemoveOptions};

use crate::actions::{Action, ActionCategory};
use crate::error::{Error, Result};
use crate::targets::TargetInfo;
use process::OutputSink;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// A single program invocation derived from an [`Action`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCommand {
    pub category: ActionCategory,
    pub program: String,
    pub args: Vec<String>,
}

impl PlannedCommand {
    fn from_action(category: &ActionCategory, action: &Action) -> Result<Self> {
        let mut tokens = action.tokens().into_iter();
        let program = tokens.next().ok_or_else(|| Error::EmptyCommand {
            action: category.to_string(),
        })?;
        Ok(Self {
            category: category.clone(),
            program,
            args: tokens.collect(),
        })
    }
}

impl fmt::Display for PlannedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Output of one successfully completed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub command: String,
    pub output: String,
}

/// A dependency add or remove request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdit {
    pub category: ActionCategory,
    pub package_name: String,
    pub is_dev: bool,
    pub use_workspace: bool,
    pub additional_flags: Vec<String>,
}

impl From<&AddOptions> for DependencyEdit {
    fn from(options: &AddOptions) -> Self {
        Self {
            category: ActionCategory::Add,
            package_name: options.package_name.clone(),
            is_dev: options.is_dev,
            use_workspace: options.use_workspace,
            additional_flags: options.additional_flags.clone(),
        }
    }
}

impl From<&RemoveOptions> for DependencyEdit {
    fn from(options: &RemoveOptions) -> Self {
        Self {
            category: ActionCategory::remove(),
            package_name: options.package_name.clone(),
            is_dev: false,
            use_workspace: options.use_workspace,
            additional_flags: options.additional_flags.clone(),
        }
    }
}

/// Commands run for `action`: install, check, then the action itself unless
/// it is `check`. `additional_args` are appended only to `dev` commands.
pub fn plan(
    target: &TargetInfo,
    action: &ActionCategory,
    additional_args: &[String],
) -> Result<Vec<PlannedCommand>> {
    let mut stages = vec![ActionCategory::Install, ActionCategory::Check];
    if *action != ActionCategory::Check {
        stages.push(action.clone());
    }

    let mut commands = Vec::new();
    for category in &stages {
        for entry in target.actions.get(category) {
            let mut command = PlannedCommand::from_action(category, entry)?;
            if !category.edits_dependencies() {
                command.args.extend(entry.flags.iter().cloned());
            }
            if *category == ActionCategory::Dev {
                command.args.extend(additional_args.iter().cloned());
            }
            commands.push(command);
        }
    }
    Ok(commands)
}

/// The add/remove invocation: first action of the category, the package
/// name, dev flags when requested, the workspace flag, then extra flags.
/// Repeated flags are dropped.
pub fn plan_dependency_edit(target: &TargetInfo, edit: &DependencyEdit) -> Result<PlannedCommand> {
    let action = target
        .actions
        .get(&edit.category)
        .first()
        .ok_or_else(|| Error::NoActionForTarget {
            address: target.address(),
            action: edit.category.to_string(),
        })?;

    let mut command = PlannedCommand::from_action(&edit.category, action)?;
    command.args.push(edit.package_name.clone());

    let mut flags: Vec<String> = Vec::new();
    if edit.is_dev {
        flags.extend(action.flags.iter().cloned());
    }
    if edit.use_workspace {
        if let Some(flag) = workspace_flag(target.package_manager.as_deref()) {
            flags.push(flag.to_string());
        }
    }
    flags.extend(edit.additional_flags.iter().cloned());

    for flag in flags {
        if !command.args.contains(&flag) {
            command.args.push(flag);
        }
    }
    Ok(command)
}

fn workspace_flag(package_manager: Option<&str>) -> Option<&'static str> {
    match package_manager {
        Some("pnpm") => Some("-w"),
        Some("yarn") => Some("-W"),
        _ => None,
    }
}

/// Runs planned commands for targets of one repository
pub struct CommandRunner {
    repo_path: PathBuf,
    sink: OutputSink,
}

impl CommandRunner {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            sink: OutputSink::default(),
        }
    }

    pub fn with_output(mut self, callback: Option<OutputCallback>) -> Self {
        self.sink.callback = callback;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.sink.echo = echo;
        self
    }

    /// Repository root for root targets, else the target's directory
    pub fn working_dir(&self, target: &TargetInfo) -> PathBuf {
        if target.path.is_empty() {
            self.repo_path.clone()
        } else {
            self.repo_path.join(&target.path)
        }
    }

    pub async fn execute(
        &self,
        target: &TargetInfo,
        action: &ActionCategory,
        additional_args: &[String],
    ) -> Result<Vec<CommandOutput>> {
        let commands = plan(target, action, additional_args)?;
        let workdir = self.working_dir(target);

        info!(
            address = %target.address(),
            action = %action,
            commands = commands.len(),
            "Executing action"
        );

        let mut outputs = Vec::with_capacity(commands.len());
        for command in &commands {
            outputs.push(self.run_one(command, &workdir).await?);
        }
        Ok(outputs)
    }

    pub async fn execute_dependency_edit(
        &self,
        target: &TargetInfo,
        edit: &DependencyEdit,
    ) -> Result<CommandOutput> {
        let command = plan_dependency_edit(target, edit)?;
        info!(
            address = %target.address(),
            action = %edit.category,
            package = %edit.package_name,
            "Editing dependencies"
        );
        self.run_one(&command, &self.working_dir(target)).await
    }

    async fn run_one(&self, command: &PlannedCommand, workdir: &Path) -> Result<CommandOutput> {
        let rendered = command.to_string();
        self.sink.emit(&format!("$ {rendered}"), OutputLevel::Info);

        match process::run(command, workdir, &self.sink).await {
            Ok(output) => {
                self.sink.emit(&format!("✓ {rendered}"), OutputLevel::Success);
                Ok(CommandOutput {
                    command: rendered,
                    output,
                })
            }
            Err(err) => {
                self.sink.emit(&err.to_string(), OutputLevel::Error);
                Err(err)
            }
        }
    }
}

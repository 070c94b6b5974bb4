//! Entry points: repository detection, command execution and bulk data

use crate::actions::ActionCategory;
use crate::bootstrap::PackageScanner;
use crate::bulk::{self, BulkTargetData};
use crate::config::RepoTargetsConfig;
use crate::error::Result;
use crate::manifest::{directory_name, relative_path};
use crate::runner::{
    AddOptions, CommandOutput, CommandRunner, DependencyEdit, ExecuteOptions, OutputCallback,
    RemoveOptions,
};
use crate::targets::{self, ProjectContext, TargetBuilder, TargetInfo};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Scan `path` and build its targets.
///
/// Fails on an invalid repository path or a malformed `package.json`.
pub async fn detect_repo(path: impl AsRef<Path>) -> Result<ProjectContext> {
    detect_repo_with_config(path, &RepoTargetsConfig::default()).await
}

/// Like [`detect_repo`], but logs any failure and returns an empty context
pub async fn detect_repo_or_default(path: impl AsRef<Path>) -> ProjectContext {
    let path = path.as_ref();
    match detect_repo(path).await {
        Ok(context) => context,
        Err(err) => {
            error!(repo = %path.display(), error = %err, "Repository detection failed");
            ProjectContext::default()
        }
    }
}

pub async fn detect_repo_with_config(
    path: impl AsRef<Path>,
    config: &RepoTargetsConfig,
) -> Result<ProjectContext> {
    analyze(path.as_ref(), config).await.map(|(_, context)| context)
}

/// Canonical repository root plus its project context
async fn analyze(path: &Path, config: &RepoTargetsConfig) -> Result<(PathBuf, ProjectContext)> {
    let scanner = PackageScanner::with_config(path, config.scan_config())?;

    let (scanner, packages) = tokio::task::spawn_blocking(move || {
        let packages = scanner.scan();
        (scanner, packages)
    })
    .await?;
    let packages = packages?;

    let repo_path = scanner.repo_path().to_path_buf();
    let output = TargetBuilder::new(&repo_path, scanner.matcher())
        .build(packages)
        .await?;

    let context = ProjectContext {
        name: directory_name(&repo_path),
        targets: output.targets,
        target_dependencies: (!output.dependencies.is_empty()).then_some(output.dependencies),
    };

    info!(
        repo = %repo_path.display(),
        project = %context.name,
        targets = context.targets.len(),
        "Repository detected"
    );

    Ok((repo_path, context))
}

/// `cwd` relative to the repository root; empty when it is the root or lies outside it
fn relative_cwd(repo_path: &Path, cwd: Option<&Path>) -> String {
    let cwd = match cwd {
        Some(dir) => dir.to_path_buf(),
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(_) => return String::new(),
        },
    };
    let cwd = cwd.canonicalize().unwrap_or(cwd);
    relative_path(repo_path, &cwd)
}

fn runner(repo_path: &Path, on_output: Option<OutputCallback>, echo: bool) -> CommandRunner {
    CommandRunner::new(repo_path)
        .with_output(on_output)
        .with_echo(echo)
}

/// Resolve `specifier` in the repository and run install, check, then `action`.
///
/// `action` names a category (`build`, `dev`, `run`, ...); unknown names are
/// looked up as custom categories and are no-ops when the target lacks them.
pub async fn execute_repository_command(
    action: &str,
    specifier: Option<&str>,
    repo_path: impl AsRef<Path>,
    options: ExecuteOptions,
) -> Result<Vec<CommandOutput>> {
    let (repo_path, context) = analyze(repo_path.as_ref(), &RepoTargetsConfig::default()).await?;
    let cwd = relative_cwd(&repo_path, options.cwd.as_deref());
    let target = targets::resolve(specifier, &cwd, &context.targets)?;

    let action = ActionCategory::parse_or_custom(action);
    runner(&repo_path, options.on_output, options.echo)
        .execute(target, &action, &options.additional_args)
        .await
}

/// Add a dependency to the resolved target with its package manager
pub async fn execute_add_command(
    specifier: Option<&str>,
    repo_path: impl AsRef<Path>,
    options: AddOptions,
) -> Result<CommandOutput> {
    let edit = DependencyEdit::from(&options);
    edit_dependencies(specifier, repo_path.as_ref(), options.cwd, options.on_output, options.echo, edit).await
}

/// Remove a dependency from the resolved target with its package manager
pub async fn execute_remove_command(
    specifier: Option<&str>,
    repo_path: impl AsRef<Path>,
    options: RemoveOptions,
) -> Result<CommandOutput> {
    let edit = DependencyEdit::from(&options);
    edit_dependencies(specifier, repo_path.as_ref(), options.cwd, options.on_output, options.echo, edit).await
}

async fn edit_dependencies(
    specifier: Option<&str>,
    repo_path: &Path,
    cwd: Option<PathBuf>,
    on_output: Option<OutputCallback>,
    echo: bool,
    edit: DependencyEdit,
) -> Result<CommandOutput> {
    let (repo_path, context) = analyze(repo_path, &RepoTargetsConfig::default()).await?;
    let cwd = relative_cwd(&repo_path, cwd.as_deref());
    let target = targets::resolve(specifier, &cwd, &context.targets)?;

    runner(&repo_path, on_output, echo)
        .execute_dependency_edit(target, &edit)
        .await
}

/// Dependencies and env variable names for each of `targets`
pub async fn get_bulk_target_data(
    targets: &[TargetInfo],
    repo_path: impl AsRef<Path>,
) -> Result<BulkTargetData> {
    bulk::get_bulk_data(targets, repo_path.as_ref()).await
}

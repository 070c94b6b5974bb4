//! Command handlers; each returns the process exit code

use super::commands::{AddArgs, DetectArgs, RemoveArgs};
use super::output::{error_line, summary_line, OutputFormatter};
use crate::api;
use crate::config::RepoTargetsConfig;
use crate::runner::{AddOptions, ExecuteOptions, RemoveOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Global settings shared by every handler
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub repo_path: PathBuf,
    pub config: RepoTargetsConfig,
    pub quiet: bool,
}

impl HandlerContext {
    fn echo(&self) -> bool {
        self.config.echo_output && !self.quiet
    }

    fn repo(&self) -> &Path {
        &self.repo_path
    }
}

fn fail(err: impl std::fmt::Display) -> i32 {
    error!(error = %err, "Command failed");
    eprintln!("{}", error_line(&err));
    1
}

pub async fn handle_detect(args: &DetectArgs, ctx: &HandlerContext) -> i32 {
    debug!(repo = %ctx.repo_path.display(), "Detecting targets");

    let context = match api::detect_repo_with_config(ctx.repo(), &ctx.config).await {
        Ok(context) => context,
        Err(err) => return fail(err),
    };

    match OutputFormatter::new(args.format.into()).format(&context) {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(err) => fail(format!("{err:#}")),
    }
}

/// `build`, `dev`, `check`, `lint`, `test` and `run`
pub async fn handle_action(
    action: &str,
    target: Option<&str>,
    additional_args: Vec<String>,
    ctx: &HandlerContext,
) -> i32 {
    let options = ExecuteOptions {
        additional_args,
        echo: ctx.echo(),
        ..Default::default()
    };

    match api::execute_repository_command(action, target, ctx.repo(), options).await {
        Ok(outputs) => {
            eprintln!("{}", summary_line(action, target, &outputs));
            0
        }
        Err(err) => fail(err),
    }
}

pub async fn handle_add(args: &AddArgs, ctx: &HandlerContext) -> i32 {
    let options = AddOptions {
        package_name: args.package.clone(),
        is_dev: args.dev,
        use_workspace: args.workspace,
        additional_flags: args.flags.clone(),
        echo: ctx.echo(),
        ..Default::default()
    };

    match api::execute_add_command(args.target.as_deref(), ctx.repo(), options).await {
        Ok(output) => {
            eprintln!("{}", summary_line("add", args.target.as_deref(), &[output]));
            0
        }
        Err(err) => fail(err),
    }
}

pub async fn handle_remove(args: &RemoveArgs, ctx: &HandlerContext) -> i32 {
    let options = RemoveOptions {
        package_name: args.package.clone(),
        use_workspace: args.workspace,
        echo: ctx.echo(),
        ..Default::default()
    };

    match api::execute_remove_command(args.target.as_deref(), ctx.repo(), options).await {
        Ok(output) => {
            eprintln!("{}", summary_line("remove", args.target.as_deref(), &[output]));
            0
        }
        Err(err) => fail(err),
    }
}

use repotargets::cli::commands::{CliArgs, Commands};
use repotargets::cli::handlers::{handle_action, handle_add, handle_detect, handle_remove, HandlerContext};
use repotargets::util::logging::{init_logging, parse_level, LoggingConfig};
use repotargets::{RepoTargetsConfig, NAME, VERSION};

use anyhow::Context;
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::process;
use tracing::{debug, error, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let config = RepoTargetsConfig::default();
    init_logging_from_args(&args, &config);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let ctx = match handler_context(&args, config) {
        Ok(ctx) => ctx,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("{} {:#}", console::style("✖").red().bold(), err);
            process::exit(1);
        }
    };

    let exit_code = match &args.command {
        Commands::Detect(detect_args) => handle_detect(detect_args, &ctx).await,
        Commands::Build(t) => handle_action("build", t.target.as_deref(), Vec::new(), &ctx).await,
        Commands::Check(t) => handle_action("check", t.target.as_deref(), Vec::new(), &ctx).await,
        Commands::Lint(t) => handle_action("lint", t.target.as_deref(), Vec::new(), &ctx).await,
        Commands::Test(t) => handle_action("test", t.target.as_deref(), Vec::new(), &ctx).await,
        Commands::Dev(d) | Commands::Run(d) => {
            handle_action("dev", d.target.as_deref(), d.args.clone(), &ctx).await
        }
        Commands::Add(add_args) => handle_add(add_args, &ctx).await,
        Commands::Remove(remove_args) => handle_remove(remove_args, &ctx).await,
    };

    process::exit(exit_code);
}

fn handler_context(args: &CliArgs, mut config: RepoTargetsConfig) -> anyhow::Result<HandlerContext> {
    if let Some(level) = &args.log_level {
        config.log_level = level.to_lowercase();
    }
    config.validate().context("Configuration error")?;

    let repo_path = match &args.path {
        Some(path) => path.clone(),
        None => env::current_dir().context("Failed to get current directory")?,
    };
    let repo_path: PathBuf = repo_path
        .canonicalize()
        .with_context(|| format!("Repository path does not exist: {}", repo_path.display()))?;

    Ok(HandlerContext {
        repo_path,
        config,
        quiet: args.quiet,
    })
}

fn init_logging_from_args(args: &CliArgs, config: &RepoTargetsConfig) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    init_logging(LoggingConfig {
        level,
        use_json: config.log_json,
        ..Default::default()
    });
}

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Discover, resolve and run the targets of a polyglot repository
#[derive(Parser, Debug)]
#[command(
    name = "repotargets",
    about = "Discover, resolve and run the targets of a polyglot repository",
    version,
    long_about = "repotargets scans a repository for package manifests (package.json, Cargo.toml, \
                  go.mod, pom.xml, build.gradle, composer.json, Gemfile, Python manifests), turns \
                  each package into an addressable target and runs its install, check and action \
                  commands."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'p',
        long,
        global = true,
        value_name = "DIR",
        help = "Repository root (defaults to the current directory)"
    )]
    pub path: Option<PathBuf>,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors and do not echo command output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "List the targets of a repository",
        long_about = "Scans the repository and prints every target with its actions.\n\n\
                      Examples:\n  \
                      repotargets detect\n  \
                      repotargets --path ../monorepo detect --format json"
    )]
    Detect(DetectArgs),

    #[command(about = "Run install, check and build for a target")]
    Build(TargetArgs),

    #[command(
        about = "Run install, check and dev for a target",
        long_about = "Arguments after `--` are passed to the dev command.\n\n\
                      Examples:\n  \
                      repotargets dev :web\n  \
                      repotargets dev //frontend -- --port 4000"
    )]
    Dev(DevArgs),

    #[command(about = "Run install and check for a target")]
    Check(TargetArgs),

    #[command(about = "Run install, check and lint for a target")]
    Lint(TargetArgs),

    #[command(about = "Run install, check and test for a target")]
    Test(TargetArgs),

    #[command(about = "Alias for dev")]
    Run(DevArgs),

    #[command(
        about = "Add a dependency to a target",
        long_about = "Examples:\n  \
                      repotargets add lodash\n  \
                      repotargets add vitest --dev --target //frontend\n  \
                      repotargets add zod --workspace"
    )]
    Add(AddArgs),

    #[command(about = "Remove a dependency from a target")]
    Remove(RemoveArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    #[arg(
        value_name = "TARGET",
        help = "Target specifier: path:name, //path[:name], path, :name or name"
    )]
    pub target: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DevArgs {
    #[arg(value_name = "TARGET", help = "Target specifier")]
    pub target: Option<String>,

    #[arg(last = true, value_name = "ARGS", help = "Extra arguments for the dev command")]
    pub args: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(value_name = "PACKAGE", help = "Dependency to add")]
    pub package: String,

    #[arg(short = 't', long, value_name = "TARGET", help = "Target specifier")]
    pub target: Option<String>,

    #[arg(short = 'D', long, help = "Add as a development dependency")]
    pub dev: bool,

    #[arg(short = 'W', long, help = "Add at the workspace root (pnpm, yarn)")]
    pub workspace: bool,

    #[arg(last = true, value_name = "FLAGS", help = "Extra flags for the package manager")]
    pub flags: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RemoveArgs {
    #[arg(value_name = "PACKAGE", help = "Dependency to remove")]
    pub package: String,

    #[arg(short = 't', long, value_name = "TARGET", help = "Target specifier")]
    pub target: Option<String>,

    #[arg(short = 'W', long, help = "Remove from the workspace root (pnpm, yarn)")]
    pub workspace: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_detect_args() {
        let args = CliArgs::parse_from(["repotargets", "detect"]);
        match args.command {
            Commands::Detect(detect_args) => assert_eq!(detect_args.format, OutputFormatArg::Human),
            _ => panic!("Expected Detect command"),
        }
        assert!(args.path.is_none());
    }

    #[test]
    fn test_global_path_after_subcommand() {
        let args = CliArgs::parse_from(["repotargets", "build", "//services/auth", "--path", "/tmp/repo"]);
        assert_eq!(args.path, Some(PathBuf::from("/tmp/repo")));
        match args.command {
            Commands::Build(target) => assert_eq!(target.target.as_deref(), Some("//services/auth")),
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_dev_trailing_args() {
        let args = CliArgs::parse_from(["repotargets", "dev", ":web", "--", "--port", "4000"]);
        match args.command {
            Commands::Dev(dev) => {
                assert_eq!(dev.target.as_deref(), Some(":web"));
                assert_eq!(dev.args, vec!["--port", "4000"]);
            }
            _ => panic!("Expected Dev command"),
        }
    }

    #[test]
    fn test_run_without_target() {
        let args = CliArgs::parse_from(["repotargets", "run"]);
        match args.command {
            Commands::Run(dev) => {
                assert!(dev.target.is_none());
                assert!(dev.args.is_empty());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_add_flags() {
        let args = CliArgs::parse_from(["repotargets", "add", "vitest", "--dev", "-W", "-t", "//frontend"]);
        match args.command {
            Commands::Add(add) => {
                assert_eq!(add.package, "vitest");
                assert!(add.dev);
                assert!(add.workspace);
                assert_eq!(add.target.as_deref(), Some("//frontend"));
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_add_requires_package() {
        assert!(CliArgs::try_parse_from(["repotargets", "add"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(CliArgs::try_parse_from(["repotargets", "-q", "-v", "detect"]).is_err());
    }
}

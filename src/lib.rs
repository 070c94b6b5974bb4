//! repotargets - polyglot repository target discovery and execution
//!
//! Walks a repository, recognizes the manifests of Node, Rust, Go, Java, PHP,
//! Ruby and Python packages, and turns every package (plus its runnable
//! scripts) into an addressable target with a synthesized action pipeline.
//! Targets can then be resolved from short specifiers and their actions run
//! with live output.
//!
//! # Core Concepts
//!
//! - **Address**: `<repo-relative-path>:<name>`; root targets are `:<name>`
//! - **Action pipeline**: category (`install`, `build`, `dev`, ...) to ordered commands
//! - **Specifier**: `path:name`, `//path[:name]`, `path`, `:name` or `name`
//!
//! # Example
//!
//! ```no_run
//! use repotargets::{detect_repo, execute_repository_command, ExecuteOptions};
//!
//! # async fn example() -> repotargets::Result<()> {
//! let context = detect_repo(".").await?;
//! for address in context.addresses() {
//!     println!("{address}");
//! }
//!
//! execute_repository_command("build", Some("//services/auth"), ".", ExecuteOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod api;
pub mod bootstrap;
pub mod bulk;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod runner;
pub mod stack;
pub mod targets;
pub mod util;

pub use actions::{Action, ActionCategory, ActionPipeline};
pub use api::{
    detect_repo, detect_repo_or_default, detect_repo_with_config, execute_add_command,
    execute_remove_command, execute_repository_command, get_bulk_target_data,
};
pub use bulk::{BulkTargetData, TargetData};
pub use config::{ConfigError, RepoTargetsConfig};
pub use error::{Error, Result};
pub use runner::{AddOptions, CommandOutput, ExecuteOptions, OutputCallback, OutputLevel, RemoveOptions};
pub use targets::{ProjectContext, TargetInfo, TargetMap, TargetType};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_repotargets() {
        assert_eq!(NAME, "repotargets");
    }
}

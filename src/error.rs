//! Error types for repository analysis and command execution

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while analyzing a repository or running a target's commands
#[derive(Debug, Error)]
pub enum Error {
    /// The repository path does not exist or is not a directory
    #[error("Invalid repository path: {}", .0.display())]
    InvalidRepository(PathBuf),

    /// A file or directory could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest needed for name or script extraction is malformed
    #[error("Failed to parse {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    /// No target matched the specifier
    #[error("Target not found: {specifier}. Available targets: {}", format_available(.available))]
    TargetNotFound {
        specifier: String,
        available: Vec<String>,
    },

    /// A command exited with a non-zero status
    #[error("Command `{command}` failed with exit code {}\n{output}", format_code(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    /// A command could not be started
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An action entry had no program to run
    #[error("Empty command in {action} action")]
    EmptyCommand { action: String },

    /// The resolved target does not define the requested action
    #[error("Target {address} has no {action} command")]
    NoActionForTarget { address: String, action: String },

    /// A background analysis task panicked or was cancelled
    #[error("Analysis task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Library result alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::ManifestParse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "(none)".to_string()
    } else {
        available.join(", ")
    }
}

fn format_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_not_found_lists_candidates() {
        let err = Error::TargetNotFound {
            specifier: ":web".to_string(),
            available: vec!["frontend:web".to_string(), ":app".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains(":web"));
        assert!(message.contains("frontend:web, :app"));
    }

    #[test]
    fn test_target_not_found_without_targets() {
        let err = Error::TargetNotFound {
            specifier: "api".to_string(),
            available: vec![],
        };
        assert!(err.to_string().contains("(none)"));
    }

    #[test]
    fn test_command_failed_embeds_output() {
        let err = Error::CommandFailed {
            command: "npm run build".to_string(),
            code: Some(2),
            output: "webpack: not found".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("npm run build"));
        assert!(message.contains("exit code 2"));
        assert!(message.contains("webpack: not found"));
    }

    #[test]
    fn test_manifest_parse_names_file() {
        let err = Error::parse("web/package.json", "expected value at line 1 column 1");
        assert!(err.to_string().contains("web/package.json"));
    }
}

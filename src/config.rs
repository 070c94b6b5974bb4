//! Configuration management for repotargets
//!
//! Settings are loaded from environment variables with defaults; command
//! line flags override them in the binary.
//!
//! # Environment Variables
//!
//! - `REPOTARGETS_LOG_LEVEL`: Logging level - default: "info"
//! - `REPOTARGETS_LOG_JSON`: Emit JSON logs (true|false) - default: "false"
//! - `REPOTARGETS_MAX_DEPTH`: Maximum scan depth below the repository root - default: unlimited
//! - `REPOTARGETS_EXTRA_IGNORE`: Comma-separated ignore patterns added to the defaults
//! - `REPOTARGETS_ECHO_OUTPUT`: Mirror command output to the terminal (true|false) - default: "true"
//!
//! # Example
//!
//! ```no_run
//! use repotargets::RepoTargetsConfig;
//!
//! let config = RepoTargetsConfig::default();
//! config.validate().expect("Invalid configuration");
//! let scan = config.scan_config();
//! ```

use crate::bootstrap::ScanConfig;
use std::env;
use std::fmt;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ECHO_OUTPUT: bool = true;
const MAX_SCAN_DEPTH: usize = 256;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepoTargetsConfig {
    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit JSON logs instead of human-readable lines
    pub log_json: bool,

    /// Maximum directory depth the scanner descends; unlimited when `None`
    pub max_depth: Option<usize>,

    /// Ignore patterns evaluated after the built-in defaults
    pub extra_ignore: Vec<String>,

    /// Mirror command output to stdout/stderr while running actions
    pub echo_output: bool,
}

impl Default for RepoTargetsConfig {
    /// Loads from `REPOTARGETS_*` environment variables, falling back to
    /// defaults for anything unset or unparsable
    fn default() -> Self {
        let log_level = env::var("REPOTARGETS_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env::var("REPOTARGETS_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let max_depth = env::var("REPOTARGETS_MAX_DEPTH")
            .ok()
            .and_then(|v| v.parse::<usize>().ok());

        let extra_ignore = env::var("REPOTARGETS_EXTRA_IGNORE")
            .map(|v| parse_list(&v))
            .unwrap_or_default();

        let echo_output = env::var("REPOTARGETS_ECHO_OUTPUT")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_ECHO_OUTPUT);

        Self {
            log_level,
            log_json,
            max_depth,
            extra_ignore,
            echo_output,
        }
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl RepoTargetsConfig {
    /// Checks the log level, the scan depth and the ignore patterns
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if let Some(depth) = self.max_depth {
            if depth == 0 {
                return Err(ConfigError::ValidationFailed(
                    "Max depth must be at least 1".to_string(),
                ));
            }
            if depth > MAX_SCAN_DEPTH {
                return Err(ConfigError::ValidationFailed(format!(
                    "Max depth cannot exceed {MAX_SCAN_DEPTH}"
                )));
            }
        }

        if let Some(pattern) = self.extra_ignore.iter().find(|p| p.trim() == "!") {
            return Err(ConfigError::ParseError {
                field: "extra_ignore".to_string(),
                error: format!("pattern '{pattern}' negates nothing"),
            });
        }

        Ok(())
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            max_depth: self.max_depth,
            extra_ignore: self.extra_ignore.clone(),
        }
    }
}

impl fmt::Display for RepoTargetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Repotargets Configuration:")?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  JSON Logs: {}", self.log_json)?;
        match self.max_depth {
            Some(depth) => writeln!(f, "  Max Depth: {depth}")?,
            None => writeln!(f, "  Max Depth: unlimited")?,
        }
        if !self.extra_ignore.is_empty() {
            writeln!(f, "  Extra Ignore: {}", self.extra_ignore.join(", "))?;
        }
        writeln!(f, "  Echo Output: {}", self.echo_output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("REPOTARGETS_LOG_LEVEL"),
            EnvGuard::unset("REPOTARGETS_LOG_JSON"),
            EnvGuard::unset("REPOTARGETS_MAX_DEPTH"),
            EnvGuard::unset("REPOTARGETS_EXTRA_IGNORE"),
            EnvGuard::unset("REPOTARGETS_ECHO_OUTPUT"),
        ];

        let config = RepoTargetsConfig::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(!config.log_json);
        assert_eq!(config.max_depth, None);
        assert!(config.extra_ignore.is_empty());
        assert_eq!(config.echo_output, DEFAULT_ECHO_OUTPUT);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("REPOTARGETS_LOG_LEVEL", "DEBUG"),
            EnvGuard::set("REPOTARGETS_LOG_JSON", "true"),
            EnvGuard::set("REPOTARGETS_MAX_DEPTH", "4"),
            EnvGuard::set("REPOTARGETS_EXTRA_IGNORE", "fixtures/, *.generated ,,"),
            EnvGuard::set("REPOTARGETS_ECHO_OUTPUT", "false"),
        ];

        let config = RepoTargetsConfig::default();
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
        assert_eq!(config.max_depth, Some(4));
        assert_eq!(config.extra_ignore, vec!["fixtures/", "*.generated"]);
        assert!(!config.echo_output);

        let scan = config.scan_config();
        assert_eq!(scan.max_depth, Some(4));
        assert_eq!(scan.extra_ignore.len(), 2);
    }

    #[test]
    #[serial]
    fn test_unparsable_values_fall_back() {
        let _guards = vec![
            EnvGuard::set("REPOTARGETS_MAX_DEPTH", "deep"),
            EnvGuard::set("REPOTARGETS_ECHO_OUTPUT", "maybe"),
        ];

        let config = RepoTargetsConfig::default();
        assert_eq!(config.max_depth, None);
        assert_eq!(config.echo_output, DEFAULT_ECHO_OUTPUT);
    }

    fn valid() -> RepoTargetsConfig {
        RepoTargetsConfig {
            log_level: "info".to_string(),
            log_json: false,
            max_depth: Some(8),
            extra_ignore: vec![],
            echo_output: true,
        }
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let config = RepoTargetsConfig {
            log_level: "loud".to_string(),
            ..valid()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn test_validation_depth_bounds() {
        assert!(valid().validate().is_ok());
        for depth in [0, MAX_SCAN_DEPTH + 1] {
            let config = RepoTargetsConfig {
                max_depth: Some(depth),
                ..valid()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_validation_rejects_bare_negation() {
        let config = RepoTargetsConfig {
            extra_ignore: vec!["!".to_string()],
            ..valid()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_config_display() {
        let display = valid().to_string();
        assert!(display.contains("Repotargets Configuration:"));
        assert!(display.contains("Max Depth: 8"));
    }
}

//! Output formatting for detection results
//!
//! JSON mirrors the library's serialized [`ProjectContext`]; the human format
//! lists one target per block with its pipeline.

use anyhow::{Context, Result};
use console::style;
use std::fmt::Write;

use crate::runner::CommandOutput;
use crate::targets::{ProjectContext, TargetType};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, context: &ProjectContext) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(context)
                .context("Failed to serialize project context to JSON"),
            OutputFormat::Human => Ok(self.format_human(context)),
        }
    }

    fn format_human(&self, context: &ProjectContext) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {} ({} targets)",
            style("Project").bold(),
            style(&context.name).cyan().bold(),
            context.targets.len()
        );

        for (address, target) in &context.targets {
            let kind = match target.target_type {
                TargetType::Package => "package",
                TargetType::Script => "script",
            };
            let _ = writeln!(out);
            let _ = write!(out, "{}  {} {}", style(address).green().bold(), kind, target.language);
            if let Some(framework) = &target.framework {
                let _ = write!(out, " / {framework}");
            }
            if let Some(pm) = &target.package_manager {
                let _ = write!(out, " [{pm}]");
            }
            let _ = writeln!(out);

            if let Some(entrypoint) = &target.entrypoint {
                let _ = writeln!(out, "    entrypoint: {entrypoint}");
            }
            for category in target.actions.categories() {
                let commands: Vec<&str> = target
                    .actions
                    .get(category)
                    .iter()
                    .map(|a| a.command.as_str())
                    .collect();
                let _ = writeln!(out, "    {:<8} {}", category.as_str(), commands.join(" && "));
            }
            if let Some(deps) = &target.internal_dependencies {
                let _ = writeln!(out, "    imports: {}", deps.join(", "));
            }
        }

        out
    }
}

/// One-line colorized result for a command verb
pub fn summary_line(verb: &str, address: Option<&str>, outputs: &[CommandOutput]) -> String {
    let target = address.unwrap_or("default target");
    format!(
        "{} {} {} ({} command{})",
        style("✔").green().bold(),
        style(verb).bold(),
        style(target).cyan(),
        outputs.len(),
        if outputs.len() == 1 { "" } else { "s" }
    )
}

/// One-line colorized failure summary
pub fn error_line(err: &dyn std::fmt::Display) -> String {
    let message = err.to_string();
    let first_line = message.lines().next().unwrap_or_default();
    format!("{} {}", style("✖").red().bold(), style(first_line).red())
}

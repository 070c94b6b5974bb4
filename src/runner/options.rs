use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Severity attached to every line forwarded to an [`OutputCallback`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    /// Command headers and child stdout
    Info,
    /// Child stderr and failures
    Error,
    /// A command finished successfully
    Success,
}

/// Receives each line of command output as it is produced
pub type OutputCallback = Arc<dyn Fn(&str, OutputLevel) + Send + Sync>;

/// Options for [`crate::execute_repository_command`]
#[derive(Clone, Default)]
pub struct ExecuteOptions {
    pub on_output: Option<OutputCallback>,
    /// Appended to the command line of the `dev` action only
    pub additional_args: Vec<String>,
    /// Directory used to resolve `:name` specifiers; the process cwd when unset
    pub cwd: Option<PathBuf>,
    /// Mirror child output to this process's stdout/stderr
    pub echo: bool,
}

/// Options for [`crate::execute_add_command`]
#[derive(Clone, Default)]
pub struct AddOptions {
    pub package_name: String,
    /// Append the target's dev-dependency flags
    pub is_dev: bool,
    /// Install at the workspace root (pnpm `-w`, yarn `-W`)
    pub use_workspace: bool,
    pub additional_flags: Vec<String>,
    pub on_output: Option<OutputCallback>,
    pub cwd: Option<PathBuf>,
    pub echo: bool,
}

/// Options for [`crate::execute_remove_command`]
#[derive(Clone, Default)]
pub struct RemoveOptions {
    pub package_name: String,
    pub use_workspace: bool,
    pub additional_flags: Vec<String>,
    pub on_output: Option<OutputCallback>,
    pub cwd: Option<PathBuf>,
    pub echo: bool,
}

fn has_callback(callback: &Option<OutputCallback>) -> &'static str {
    if callback.is_some() {
        "Some(<callback>)"
    } else {
        "None"
    }
}

impl fmt::Debug for ExecuteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteOptions")
            .field("on_output", &has_callback(&self.on_output))
            .field("additional_args", &self.additional_args)
            .field("cwd", &self.cwd)
            .field("echo", &self.echo)
            .finish()
    }
}

impl fmt::Debug for AddOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddOptions")
            .field("package_name", &self.package_name)
            .field("is_dev", &self.is_dev)
            .field("use_workspace", &self.use_workspace)
            .field("additional_flags", &self.additional_flags)
            .field("on_output", &has_callback(&self.on_output))
            .finish()
    }
}

impl fmt::Debug for RemoveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoveOptions")
            .field("package_name", &self.package_name)
            .field("use_workspace", &self.use_workspace)
            .field("additional_flags", &self.additional_flags)
            .field("on_output", &has_callback(&self.on_output))
            .finish()
    }
}

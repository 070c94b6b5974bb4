pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{AddArgs, CliArgs, Commands, DetectArgs, DevArgs, RemoveArgs, TargetArgs};
pub use handlers::HandlerContext;
pub use output::{OutputFormat, OutputFormatter};

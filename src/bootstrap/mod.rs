mod matcher;
mod scanner;

pub use matcher::{IgnoreMatcher, IgnoreRule, DEFAULT_IGNORES};
pub use scanner::{PackageScanner, ScanConfig};

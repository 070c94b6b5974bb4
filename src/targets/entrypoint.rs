//! Python entrypoint discovery

use crate::bootstrap::IgnoreMatcher;
use crate::manifest::relative_path;
use ignore::WalkBuilder;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

const EXCLUDED_FILES: &[&str] = &["setup.py", "__init__.py", "conftest.py"];

/// Non-ignored `.py` files under `package_dir` guarded by `if __name__ == "__main__":`,
/// sorted by path
pub fn find_python_entrypoints(
    repo_root: &Path,
    package_dir: &Path,
    matcher: &Arc<IgnoreMatcher>,
) -> Vec<PathBuf> {
    let Ok(main_guard) = Regex::new(r#"(?m)^\s*if\s+__name__\s*==\s*['"]__main__['"]\s*:"#) else {
        return Vec::new();
    };

    let root = repo_root.to_path_buf();
    let filter = Arc::clone(matcher);
    let mut entrypoints = Vec::new();

    for result in WalkBuilder::new(package_dir)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map_or(false, |t| t.is_dir());
            !filter.should_ignore(&relative_path(&root, entry.path()), is_dir)
        })
        .build()
    {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "Failed to read entry while looking for entrypoints");
                continue;
            }
        };

        let path = entry.path();
        let is_candidate = entry.file_type().map_or(false, |t| t.is_file())
            && path.extension().and_then(|e| e.to_str()) == Some("py")
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| !EXCLUDED_FILES.contains(&n));
        if !is_candidate {
            continue;
        }

        match std::fs::read_to_string(path) {
            Ok(content) if main_guard.is_match(&content) => {
                debug!(file = %path.display(), "Found Python entrypoint");
                entrypoints.push(path.to_path_buf());
            }
            Ok(_) => {}
            Err(err) => debug!(file = %path.display(), error = %err, "Skipping unreadable file"),
        }
    }

    entrypoints
}

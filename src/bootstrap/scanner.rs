use super::IgnoreMatcher;
use crate::error::{Error, Result};
use crate::manifest::{self, PackageInfo};
use crate::stack::{ecosystem::MANIFEST_PRIORITY, Ecosystem};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Maximum directory depth below the root; unlimited when `None`
    pub max_depth: Option<usize>,
    /// Extra ignore patterns evaluated after the defaults and before `.gitignore`
    pub extra_ignore: Vec<String>,
}

/// Depth-first, sequential manifest discovery
pub struct PackageScanner {
    repo_path: PathBuf,
    matcher: Arc<IgnoreMatcher>,
    config: ScanConfig,
}

impl PackageScanner {
    pub fn new(repo_path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(repo_path, ScanConfig::default())
    }

    pub fn with_config(repo_path: impl Into<PathBuf>, config: ScanConfig) -> Result<Self> {
        let repo_path = repo_path.into();
        if !repo_path.is_dir() {
            return Err(Error::InvalidRepository(repo_path));
        }
        let repo_path = repo_path
            .canonicalize()
            .map_err(|e| Error::io(&repo_path, e))?;

        let matcher = Arc::new(IgnoreMatcher::for_repository(
            &repo_path,
            &config.extra_ignore,
        ));

        debug!(
            repo_path = %repo_path.display(),
            rules = matcher.rules().len(),
            "PackageScanner initialized"
        );

        Ok(Self {
            repo_path,
            matcher,
            config,
        })
    }

    /// Canonical repository root
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn matcher(&self) -> Arc<IgnoreMatcher> {
        Arc::clone(&self.matcher)
    }

    /// Walk the repository and analyze every recognized manifest.
    ///
    /// Ignored directories are pruned without descending. Unreadable entries
    /// are logged and skipped; a malformed `package.json` aborts the scan.
    pub fn scan(&self) -> Result<Vec<PackageInfo>> {
        let start = Instant::now();

        info!(
            repo = %self.repo_path.display(),
            max_depth = ?self.config.max_depth,
            "Starting package scan"
        );

        let root = self.repo_path.clone();
        let matcher = Arc::clone(&self.matcher);

        let mut packages = Vec::new();
        let mut directories_scanned = 0usize;

        for result in WalkBuilder::new(&self.repo_path)
            .standard_filters(false)
            .follow_links(false)
            .max_depth(self.config.max_depth)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().map_or(false, |t| t.is_dir());
                is_dir && !matcher.should_ignore(&manifest::relative_path(&root, entry.path()), true)
            })
            .build()
        {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().map_or(false, |t| t.is_dir()) {
                continue;
            }

            directories_scanned += 1;
            self.scan_directory(entry.path(), &mut packages)?;
        }

        info!(
            packages_found = packages.len(),
            directories_scanned,
            scan_time_ms = start.elapsed().as_millis() as u64,
            "Package scan completed"
        );

        Ok(packages)
    }

    fn scan_directory(&self, dir: &Path, packages: &mut Vec<PackageInfo>) -> Result<()> {
        for manifest_file in MANIFEST_PRIORITY {
            if !dir.join(manifest_file).is_file() {
                continue;
            }
            let is_python = Ecosystem::from_manifest(manifest_file).map_or(false, Ecosystem::is_python);

            match manifest::analyze(&self.repo_path, dir, manifest_file) {
                Ok(package) => {
                    debug!(
                        path = %package.repo_relative_path,
                        manifest = manifest_file,
                        ecosystem = %package.ecosystem,
                        "Detected package"
                    );
                    packages.push(package);
                    if !is_python {
                        break;
                    }
                }
                Err(Error::Io { path, source }) => {
                    warn!(path = %path.display(), error = %source, "Skipping unreadable manifest");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

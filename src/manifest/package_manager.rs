//! Node package manager detection from lockfiles

use crate::stack::PackageManagerId;
use std::path::Path;
use tracing::trace;

/// Lockfiles in priority order within one directory
const LOCKFILES: &[(&str, PackageManagerId)] = &[
    ("yarn.lock", PackageManagerId::Yarn),
    ("pnpm-lock.yaml", PackageManagerId::Pnpm),
    ("bun.lockb", PackageManagerId::Bun),
    ("bun.lock", PackageManagerId::Bun),
    ("package-lock.json", PackageManagerId::Npm),
];

/// Detect the package manager for a Node package in `package_dir`.
///
/// The repository root is consulted first, then the package directory, then
/// each ancestor of the package up to the root. The first directory holding a
/// known lockfile decides; without any lockfile the answer is npm.
pub fn detect_node(repo_root: &Path, package_dir: &Path) -> PackageManagerId {
    let search_order = std::iter::once(repo_root).chain(
        package_dir
            .ancestors()
            .take_while(|dir| dir.starts_with(repo_root) && *dir != repo_root),
    );

    for dir in search_order {
        if let Some(manager) = lockfile_in(dir) {
            trace!(dir = %dir.display(), manager = %manager, "Found lockfile");
            return manager;
        }
    }

    PackageManagerId::Npm
}

fn lockfile_in(dir: &Path) -> Option<PackageManagerId> {
    LOCKFILES
        .iter()
        .find(|(file, _)| dir.join(file).is_file())
        .map(|(_, manager)| manager.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_to_npm() {
        let dir = TempDir::new().unwrap();
        assert_eq!(detect_node(dir.path(), dir.path()), PackageManagerId::Npm);
    }

    #[test]
    fn test_root_lockfile_wins_over_package_lockfile() {
        let dir = TempDir::new().unwrap();
        let web = dir.path().join("apps/web");
        fs::create_dir_all(&web).unwrap();
        fs::write(dir.path().join("pnpm-lock.yaml"), "").unwrap();
        fs::write(web.join("package-lock.json"), "{}").unwrap();

        assert_eq!(detect_node(dir.path(), &web), PackageManagerId::Pnpm);
    }

    #[test]
    fn test_package_directory_before_ancestors() {
        let dir = TempDir::new().unwrap();
        let web = dir.path().join("apps/web");
        fs::create_dir_all(&web).unwrap();
        fs::write(dir.path().join("apps/yarn.lock"), "").unwrap();
        fs::write(web.join("bun.lockb"), "").unwrap();

        assert_eq!(detect_node(dir.path(), &web), PackageManagerId::Bun);
    }

    #[test]
    fn test_ancestor_lockfile() {
        let dir = TempDir::new().unwrap();
        let web = dir.path().join("apps/web");
        fs::create_dir_all(&web).unwrap();
        fs::write(dir.path().join("apps/yarn.lock"), "").unwrap();

        assert_eq!(detect_node(dir.path(), &web), PackageManagerId::Yarn);
    }

    #[test]
    fn test_priority_within_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package-lock.json"), "{}").unwrap();
        fs::write(dir.path().join("yarn.lock"), "").unwrap();

        assert_eq!(detect_node(dir.path(), dir.path()), PackageManagerId::Yarn);
    }
}

use super::entrypoint::find_python_entrypoints;
use super::imports::resolve_python_imports;
use super::{format_address, TargetInfo, TargetMap, TargetType};
use crate::actions::{self, synthesizer, Action, ActionCategory, ActionPipeline};
use crate::bootstrap::IgnoreMatcher;
use crate::error::Result;
use crate::manifest::{relative_path, PackageInfo};
use crate::stack::Ecosystem;
use futures_util::future::try_join_all;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

const ENV_FILES: &[&str] = &[".env", ".env.local"];

/// Targets produced from a scan, plus the internal import graph
#[derive(Debug, Default)]
pub struct BuildOutput {
    pub targets: TargetMap,
    /// Address to non-empty list of repo-relative files it imports
    pub dependencies: BTreeMap<String, Vec<String>>,
}

/// Turns scanned packages into addressable targets
pub struct TargetBuilder {
    repo_root: PathBuf,
    matcher: Arc<IgnoreMatcher>,
}

impl TargetBuilder {
    pub fn new(repo_root: impl Into<PathBuf>, matcher: Arc<IgnoreMatcher>) -> Self {
        Self {
            repo_root: repo_root.into(),
            matcher,
        }
    }

    /// Build every package's targets concurrently, then insert them in scan
    /// order so a later package with the same address replaces an earlier one.
    pub async fn build(&self, packages: Vec<PackageInfo>) -> Result<BuildOutput> {
        let start = Instant::now();
        let package_count = packages.len();

        let tasks = packages.into_iter().map(|package| {
            let root = self.repo_root.clone();
            let matcher = Arc::clone(&self.matcher);
            tokio::task::spawn_blocking(move || package_targets(&root, &matcher, &package))
        });
        let per_package = try_join_all(tasks).await?;

        let mut output = BuildOutput::default();
        for target in per_package.into_iter().flatten() {
            let address = target.address();
            match &target.internal_dependencies {
                Some(deps) if !deps.is_empty() => {
                    output.dependencies.insert(address.clone(), deps.clone());
                }
                _ => {
                    output.dependencies.remove(&address);
                }
            }
            if output.targets.insert(address.clone(), target).is_some() {
                debug!(address = %address, "Replacing target with duplicate address");
            }
        }

        info!(
            packages = package_count,
            targets = output.targets.len(),
            build_time_ms = start.elapsed().as_millis() as u64,
            "Targets built"
        );

        Ok(output)
    }
}

/// The package target followed by its script targets
fn package_targets(
    repo_root: &Path,
    matcher: &Arc<IgnoreMatcher>,
    package: &PackageInfo,
) -> Vec<TargetInfo> {
    let pipeline = actions::synthesize(package);
    let name = package.name();

    let mut package_target = TargetInfo {
        name: name.clone(),
        path: package.repo_relative_path.clone(),
        language: package.language.clone(),
        version: package.version.clone(),
        framework: package.framework.clone(),
        package_manager: package.package_manager.as_ref().map(|pm| pm.as_str().to_string()),
        dependency_files: existing_files(
            repo_root,
            &package.absolute_path,
            package.ecosystem.dependency_files(),
        ),
        env_files: existing_files(repo_root, &package.absolute_path, ENV_FILES),
        entrypoint: None,
        target_type: TargetType::Package,
        internal_dependencies: None,
        actions: pipeline.clone(),
    };

    let mut scripts = Vec::new();

    if package.ecosystem == Ecosystem::Node {
        let runner = synthesizer::node_runner(package);
        for script in package.scripts.keys() {
            scripts.push(TargetInfo {
                name: format!("{name}-{script}"),
                target_type: TargetType::Script,
                actions: with_dev(&pipeline, synthesizer::script_command(&runner, script)),
                ..package_target.clone()
            });
        }
    }

    if package.ecosystem.is_python() {
        let mut union = BTreeSet::new();

        for file in find_python_entrypoints(repo_root, &package.absolute_path, matcher) {
            let (Some(stem), Some(file_name)) = (
                file.file_stem().map(|s| s.to_string_lossy().into_owned()),
                file.file_name().map(|s| s.to_string_lossy().into_owned()),
            ) else {
                continue;
            };
            let file_dir = file.parent().unwrap_or(&package.absolute_path);
            let imports = resolve_python_imports(repo_root, &file);
            union.extend(imports.iter().cloned());

            debug!(
                entrypoint = %relative_path(repo_root, &file),
                imports = imports.len(),
                "Python script target"
            );

            scripts.push(TargetInfo {
                name: stem,
                path: relative_path(repo_root, file_dir),
                entrypoint: Some(relative_path(repo_root, &file)),
                target_type: TargetType::Script,
                internal_dependencies: (!imports.is_empty()).then_some(imports),
                actions: with_dev(&pipeline, Action::new(format!("python {file_name}"))),
                ..package_target.clone()
            });
        }

        if !union.is_empty() {
            package_target.internal_dependencies = Some(union.into_iter().collect());
        }
    }

    debug!(
        address = %format_address(&package_target.path, &package_target.name),
        scripts = scripts.len(),
        "Package targets generated"
    );

    let mut targets = Vec::with_capacity(scripts.len() + 1);
    targets.push(package_target);
    targets.extend(scripts);
    targets
}

fn with_dev(pipeline: &ActionPipeline, dev: Action) -> ActionPipeline {
    let mut actions = pipeline.clone();
    actions.set(ActionCategory::Dev, vec![dev]);
    actions
}

fn existing_files(repo_root: &Path, dir: &Path, candidates: &[&str]) -> Vec<String> {
    candidates
        .iter()
        .map(|file| dir.join(file))
        .filter(|path| path.is_file())
        .map(|path| relative_path(repo_root, &path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::PackageScanner;
    use std::fs;
    use tempfile::TempDir;

    async fn build(root: &Path) -> BuildOutput {
        let scanner = PackageScanner::new(root).unwrap();
        let packages = scanner.scan().unwrap();
        TargetBuilder::new(scanner.repo_path(), scanner.matcher())
            .build(packages)
            .await
            .unwrap()
    }

    fn commands(target: &TargetInfo, category: ActionCategory) -> Vec<&str> {
        target
            .actions
            .get(&category)
            .iter()
            .map(|a| a.command.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_node_package_and_script_targets() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name":"app","scripts":{"build":"tsc","dev":"vite"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("package-lock.json"), "{}").unwrap();
        fs::write(dir.path().join(".env"), "PORT=3000\n").unwrap();

        let output = build(dir.path()).await;
        let addresses: Vec<&str> = output.targets.keys().map(String::as_str).collect();
        assert_eq!(addresses, vec![":app", ":app-build", ":app-dev"]);

        let app = &output.targets[":app"];
        assert_eq!(app.target_type, TargetType::Package);
        assert_eq!(app.dependency_files, vec!["package.json", "package-lock.json"]);
        assert_eq!(app.env_files, vec![".env"]);
        assert_eq!(commands(app, ActionCategory::Build), vec!["npm run build"]);

        let script = &output.targets[":app-build"];
        assert_eq!(script.target_type, TargetType::Script);
        assert_eq!(commands(script, ActionCategory::Dev), vec!["npm run build"]);
        assert_eq!(commands(script, ActionCategory::Install), vec!["npm install"]);
    }

    #[tokio::test]
    async fn test_nested_paths_and_env_files_are_package_local() {
        let dir = TempDir::new().unwrap();
        let auth = dir.path().join("services/auth");
        fs::create_dir_all(&auth).unwrap();
        fs::write(auth.join("go.mod"), "module github.com/x/auth\n").unwrap();
        fs::write(auth.join("go.sum"), "").unwrap();
        fs::write(auth.join(".env.local"), "SECRET=1\n").unwrap();
        fs::write(dir.path().join(".env"), "ROOT=1\n").unwrap();

        let output = build(dir.path()).await;
        let auth = &output.targets["services/auth:auth"];
        assert_eq!(
            auth.dependency_files,
            vec!["services/auth/go.mod", "services/auth/go.sum"]
        );
        assert_eq!(auth.env_files, vec!["services/auth/.env.local"]);
    }

    #[tokio::test]
    async fn test_python_entrypoints_become_script_targets() {
        let dir = TempDir::new().unwrap();
        let api = dir.path().join("api");
        fs::create_dir_all(api.join("jobs")).unwrap();
        fs::write(api.join("requirements.txt"), "flask\n").unwrap();
        fs::write(api.join("db.py"), "def connect():\n    pass\n").unwrap();
        fs::write(
            api.join("jobs/cleanup.py"),
            "import db\nimport os\n\nif __name__ == \"__main__\":\n    db.connect()\n",
        )
        .unwrap();

        let output = build(dir.path()).await;

        let script = &output.targets["api/jobs:cleanup"];
        assert_eq!(script.target_type, TargetType::Script);
        assert_eq!(script.entrypoint.as_deref(), Some("api/jobs/cleanup.py"));
        assert_eq!(commands(script, ActionCategory::Dev), vec!["python cleanup.py"]);
        assert_eq!(
            commands(script, ActionCategory::Install),
            vec!["pip install -r requirements.txt"]
        );

        // db.py sits in the package dir, neither beside the file nor at the repo root
        assert_eq!(script.internal_dependencies, None);

        let package = &output.targets["api:api"];
        assert_eq!(package.target_type, TargetType::Package);
        assert_eq!(package.internal_dependencies, None);
    }

    #[tokio::test]
    async fn test_python_internal_dependencies_recorded() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("requirements.txt"), "requests\n").unwrap();
        fs::write(root.join("helpers.py"), "").unwrap();
        fs::write(
            root.join("main.py"),
            "from helpers import run\n\nif __name__ == '__main__':\n    run()\n",
        )
        .unwrap();

        let output = build(root).await;
        let root_name = crate::manifest::directory_name(&root.canonicalize().unwrap());

        assert_eq!(
            output.targets[":main"].internal_dependencies,
            Some(vec!["helpers.py".to_string()])
        );
        let package_address = format!(":{root_name}");
        assert_eq!(
            output.dependencies.get(&package_address),
            Some(&vec!["helpers.py".to_string()])
        );
        assert_eq!(
            output.dependencies.get(":main"),
            Some(&vec!["helpers.py".to_string()])
        );
    }
}

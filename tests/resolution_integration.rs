//! Target resolution against a detected monorepo

use repotargets::runner::plan;
use repotargets::targets::resolve;
use repotargets::{
    detect_repo, execute_remove_command, execute_repository_command, ActionCategory, Error,
    ExecuteOptions, OutputCallback, OutputLevel, ProjectContext, RemoveOptions,
};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

async fn monorepo() -> (TempDir, ProjectContext) {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "package.json",
        r#"{"name":"root","scripts":{"lint":"eslint ."}}"#,
    );
    write(
        dir.path(),
        "frontend/package.json",
        r#"{"name":"web","scripts":{"build":"vite build","dev":"vite"},"devDependencies":{"typescript":"^5.0.0"}}"#,
    );
    write(dir.path(), "services/auth/go.mod", "module github.com/acme/auth\n");

    let context = detect_repo(dir.path()).await.unwrap();
    (dir, context)
}

#[tokio::test]
async fn test_specifier_forms() {
    let (_dir, context) = monorepo().await;
    let targets = &context.targets;

    let address = |spec: Option<&str>, cwd: &str| resolve(spec, cwd, targets).unwrap().address();

    assert_eq!(address(Some("frontend:web"), ""), "frontend:web");
    assert_eq!(address(Some("//frontend:web"), ""), "frontend:web");
    assert_eq!(address(Some("//frontend"), ""), "frontend:web");
    assert_eq!(address(Some("frontend"), ""), "frontend:web");
    assert_eq!(address(Some("//services/auth"), ""), "services/auth:auth");
    assert_eq!(address(Some("auth"), ""), "services/auth:auth");
    assert_eq!(address(Some("//:root"), ""), ":root");
    assert_eq!(address(Some(":root-lint"), "frontend"), ":root-lint");
}

#[tokio::test]
async fn test_colon_name_is_scoped_to_current_directory() {
    let (_dir, context) = monorepo().await;
    let targets = &context.targets;

    assert_eq!(resolve(Some(":web"), "frontend", targets).unwrap().address(), "frontend:web");

    let err = resolve(Some(":web"), "", targets).unwrap_err();
    match err {
        Error::TargetNotFound { specifier, available } => {
            assert_eq!(specifier, ":web");
            assert!(available.contains(&"frontend:web".to_string()));
        }
        other => panic!("Expected TargetNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_default_target_follows_current_directory() {
    let (_dir, context) = monorepo().await;
    let targets = &context.targets;

    assert_eq!(resolve(None, "frontend", targets).unwrap().address(), "frontend:web");
    assert_eq!(resolve(None, "", targets).unwrap().address(), ":root");
}

#[tokio::test]
async fn test_build_plan_runs_install_then_check_then_build() {
    let (_dir, context) = monorepo().await;
    let web = resolve(Some("//frontend"), "", &context.targets).unwrap();

    let planned: Vec<String> = plan(web, &ActionCategory::Build, &[])
        .unwrap()
        .iter()
        .map(|command| command.to_string())
        .collect();
    assert_eq!(planned, vec!["npm install", "tsc --noEmit", "npm run build"]);
}

#[tokio::test]
async fn test_dev_plan_forwards_extra_arguments() {
    let (_dir, context) = monorepo().await;
    let web = resolve(Some("frontend:web"), "", &context.targets).unwrap();

    let args = vec!["--port".to_string(), "4000".to_string()];
    let planned = plan(web, &ActionCategory::Dev, &args).unwrap();
    let last = planned.last().unwrap();
    assert_eq!(last.to_string(), "npm run dev --port 4000");
    assert!(planned
        .iter()
        .filter(|command| command.category != ActionCategory::Dev)
        .all(|command| !command.args.contains(&"4000".to_string())));
}

#[tokio::test]
async fn test_execute_unknown_target_fails_before_running() {
    let (dir, _context) = monorepo().await;

    let options = ExecuteOptions {
        cwd: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let err = execute_repository_command("build", Some("//nowhere"), dir.path(), options)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TargetNotFound { .. }));
}

#[cfg(unix)]
#[tokio::test]
async fn test_execute_build_from_package_directory_runs_pipeline_in_order() {
    let (dir, _context) = monorepo().await;

    let headers = Arc::new(Mutex::new(Vec::new()));
    let sink = headers.clone();
    let on_output: OutputCallback = Arc::new(move |line: &str, level: OutputLevel| {
        if level == OutputLevel::Info && line.starts_with("$ ") {
            sink.lock().unwrap().push(line.to_string());
        }
    });
    let options = ExecuteOptions {
        on_output: Some(on_output),
        cwd: Some(dir.path().join("frontend")),
        ..Default::default()
    };

    let result = execute_repository_command("build", None, dir.path(), options).await;
    let expected = ["$ npm install", "$ tsc --noEmit", "$ npm run build"];
    let headers = headers.lock().unwrap().clone();

    // npm or tsc may be missing or fail offline; the commands that did start
    // must still be a prefix of the pipeline
    match result {
        Ok(outputs) => {
            assert_eq!(headers, expected);
            let commands: Vec<&str> = outputs.iter().map(|o| o.command.as_str()).collect();
            assert_eq!(commands, vec!["npm install", "tsc --noEmit", "npm run build"]);
        }
        Err(err) => {
            assert!(
                matches!(err, Error::Spawn { .. } | Error::CommandFailed { .. }),
                "unexpected error: {err:?}"
            );
            assert!(!headers.is_empty());
            assert_eq!(headers[..], expected[..headers.len()]);
        }
    }
}

#[tokio::test]
async fn test_go_target_has_no_remove_command() {
    let (dir, _context) = monorepo().await;

    let options = RemoveOptions {
        package_name: "github.com/pkg/errors".to_string(),
        cwd: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let err = execute_remove_command(Some("//services/auth"), dir.path(), options)
        .await
        .unwrap_err();
    match err {
        Error::NoActionForTarget { address, action } => {
            assert_eq!(address, "services/auth:auth");
            assert_eq!(action, "remove");
        }
        other => panic!("Expected NoActionForTarget, got {other:?}"),
    }
}

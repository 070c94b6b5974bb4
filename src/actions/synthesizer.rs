//! Action pipeline synthesis per ecosystem
//!
//! Non-Node ecosystems get a fixed command set. Node packages get package
//! manager specific install/add/remove commands, `tsc --noEmit` as a check for
//! TypeScript, and one entry per classified `package.json` script. Fixed
//! commands always precede script-derived ones.

use super::{scripts::classify_script, Action, ActionCategory, ActionPipeline};
use crate::manifest::PackageInfo;
use crate::stack::{Ecosystem, LanguageId, PackageManagerId};

pub fn synthesize(package: &PackageInfo) -> ActionPipeline {
    let mut pipeline = ActionPipeline::new();

    match package.ecosystem {
        Ecosystem::Node => node_actions(package, &mut pipeline),
        Ecosystem::Rust => rust_actions(&mut pipeline),
        Ecosystem::Go => go_actions(&mut pipeline),
        Ecosystem::JavaMaven => maven_actions(package, &mut pipeline),
        Ecosystem::JavaGradle => gradle_actions(package, &mut pipeline),
        Ecosystem::Php => composer_actions(package, &mut pipeline),
        Ecosystem::Ruby => bundler_actions(package, &mut pipeline),
        Ecosystem::Python => python_actions(package, &mut pipeline),
    }

    pipeline
}

/// Package manager of a Node package, npm when unknown
pub fn node_runner(package: &PackageInfo) -> PackageManagerId {
    package
        .package_manager
        .clone()
        .filter(PackageManagerId::is_node)
        .unwrap_or(PackageManagerId::Npm)
}

/// Command that runs a `package.json` script
pub fn script_command(runner: &PackageManagerId, script: &str) -> Action {
    Action::new(format!("{} run {}", runner.runner(), script))
}

fn node_actions(package: &PackageInfo, pipeline: &mut ActionPipeline) {
    let runner = node_runner(package);
    let pm = runner.runner();

    pipeline.push(ActionCategory::Install, Action::new(format!("{pm} install")));

    let (add, dev_flags): (String, &[&str]) = match runner {
        PackageManagerId::Yarn => ("yarn add".into(), &["--dev"]),
        PackageManagerId::Pnpm => ("pnpm add".into(), &["--save-dev", "-w"]),
        PackageManagerId::Bun => ("bun add".into(), &["--dev"]),
        _ => ("npm install".into(), &["--save-dev"]),
    };
    pipeline.push(
        ActionCategory::Add,
        Action::new(add).with_flags(dev_flags.iter().copied()),
    );

    let remove = match runner {
        PackageManagerId::Npm => "npm uninstall".to_string(),
        _ => format!("{pm} remove"),
    };
    pipeline.push(ActionCategory::remove(), Action::new(remove));

    if package.language == LanguageId::TypeScript {
        pipeline.push(ActionCategory::Check, Action::new("tsc --noEmit"));
    }

    for script in package.scripts.keys() {
        for category in classify_script(script) {
            pipeline.push(category, script_command(&runner, script));
        }
    }
}

fn rust_actions(pipeline: &mut ActionPipeline) {
    fixed(
        pipeline,
        &[
            (ActionCategory::Install, "cargo fetch"),
            (ActionCategory::Build, "cargo build"),
            (ActionCategory::Test, "cargo test"),
            (ActionCategory::Dev, "cargo run"),
            (ActionCategory::Lint, "cargo clippy"),
            (ActionCategory::Format, "cargo fmt"),
            (ActionCategory::Clean, "cargo clean"),
            (ActionCategory::Check, "cargo check"),
        ],
    );
    pipeline.push(
        ActionCategory::Add,
        Action::new("cargo add").with_flags(["--dev"]),
    );
    pipeline.push(ActionCategory::remove(), Action::new("cargo remove"));
}

fn go_actions(pipeline: &mut ActionPipeline) {
    fixed(
        pipeline,
        &[
            (ActionCategory::Install, "go mod download"),
            (ActionCategory::Build, "go build ./..."),
            (ActionCategory::Test, "go test ./..."),
            (ActionCategory::Dev, "go run ."),
            (ActionCategory::Lint, "go vet ./..."),
            (ActionCategory::Format, "go fmt ./..."),
            (ActionCategory::Clean, "go clean"),
            (ActionCategory::Add, "go get"),
        ],
    );
}

fn maven_actions(package: &PackageInfo, pipeline: &mut ActionPipeline) {
    fixed(
        pipeline,
        &[
            (ActionCategory::Install, "mvn dependency:resolve"),
            (ActionCategory::Build, "mvn package"),
            (ActionCategory::Test, "mvn test"),
            (ActionCategory::Clean, "mvn clean"),
            (ActionCategory::Deploy, "mvn deploy"),
        ],
    );
    if package.framework.as_deref() == Some("Spring Boot") {
        pipeline.push(ActionCategory::Dev, Action::new("mvn spring-boot:run"));
    }
}

fn gradle_actions(package: &PackageInfo, pipeline: &mut ActionPipeline) {
    fixed(
        pipeline,
        &[
            (ActionCategory::Install, "gradle dependencies"),
            (ActionCategory::Build, "gradle build"),
            (ActionCategory::Test, "gradle test"),
            (ActionCategory::Clean, "gradle clean"),
        ],
    );
    let dev = match package.framework.as_deref() {
        Some("Spring Boot") => "gradle bootRun",
        _ => "gradle run",
    };
    pipeline.push(ActionCategory::Dev, Action::new(dev));
}

fn composer_actions(package: &PackageInfo, pipeline: &mut ActionPipeline) {
    fixed(
        pipeline,
        &[
            (ActionCategory::Install, "composer install"),
            (ActionCategory::Test, "composer test"),
        ],
    );
    pipeline.push(
        ActionCategory::Add,
        Action::new("composer require").with_flags(["--dev"]),
    );
    pipeline.push(ActionCategory::remove(), Action::new("composer remove"));
    if package.framework.as_deref() == Some("Laravel") {
        pipeline.push(ActionCategory::Dev, Action::new("php artisan serve"));
    }
}

fn bundler_actions(package: &PackageInfo, pipeline: &mut ActionPipeline) {
    fixed(
        pipeline,
        &[
            (ActionCategory::Install, "bundle install"),
            (ActionCategory::Test, "bundle exec rake test"),
            (ActionCategory::Lint, "bundle exec rubocop"),
        ],
    );
    pipeline.push(
        ActionCategory::Add,
        Action::new("bundle add").with_flags(["--group", "development"]),
    );
    pipeline.push(ActionCategory::remove(), Action::new("bundle remove"));
    if package.framework.as_deref() == Some("Rails") {
        pipeline.push(ActionCategory::Dev, Action::new("bundle exec rails server"));
    }
}

fn python_actions(package: &PackageInfo, pipeline: &mut ActionPipeline) {
    let manager = package
        .package_manager
        .clone()
        .unwrap_or(PackageManagerId::Pip);

    let install = match (&manager, package.manifest_file.as_str()) {
        (PackageManagerId::Poetry, _) => "poetry install",
        (PackageManagerId::Pipenv, _) => "pipenv install",
        (_, "requirements.txt") => "pip install -r requirements.txt",
        _ => "pip install -e .",
    };
    pipeline.push(ActionCategory::Install, Action::new(install));

    if matches!(package.manifest_file.as_str(), "pyproject.toml" | "setup.py") {
        pipeline.push(ActionCategory::Build, Action::new("python -m build"));
    }

    fixed(
        pipeline,
        &[
            (ActionCategory::Test, "python -m pytest"),
            (ActionCategory::Lint, "python -m ruff check ."),
            (ActionCategory::Format, "python -m black ."),
        ],
    );

    let (add, dev_flags, remove): (&str, &[&str], &str) = match manager {
        PackageManagerId::Poetry => ("poetry add", &["--group", "dev"], "poetry remove"),
        PackageManagerId::Pipenv => ("pipenv install", &["--dev"], "pipenv uninstall"),
        _ => ("pip install", &[], "pip uninstall -y"),
    };
    pipeline.push(
        ActionCategory::Add,
        Action::new(add).with_flags(dev_flags.iter().copied()),
    );
    pipeline.push(ActionCategory::remove(), Action::new(remove));

    if package.framework.as_deref() == Some("Django") {
        pipeline.push(ActionCategory::Dev, Action::new("python manage.py runserver"));
    }
}

fn fixed(pipeline: &mut ActionPipeline, commands: &[(ActionCategory, &str)]) {
    for (category, command) in commands {
        pipeline.push(category.clone(), Action::new(*command));
    }
}

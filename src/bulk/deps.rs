//! Dependency table extraction, one parser per manifest format

use regex::Regex;
use roxmltree::Document;
use std::collections::BTreeMap;

/// Name to version specifier
pub type DependencyTable = BTreeMap<String, String>;

const ANY_VERSION: &str = "*";

#[derive(Debug, Default, PartialEq)]
pub struct ParsedDependencies {
    pub dependencies: DependencyTable,
    /// `None` when the format has no separate development section
    pub dev_dependencies: Option<DependencyTable>,
}

pub trait DependencyParser: Send + Sync {
    /// Returns a message describing the problem when `content` is malformed
    fn parse(&self, content: &str) -> Result<ParsedDependencies, String>;
}

/// Parser for a dependency file name, if the format is supported
pub fn parser_for(file_name: &str) -> Option<Box<dyn DependencyParser>> {
    let parser: Box<dyn DependencyParser> = match file_name {
        "package.json" => Box::new(JsonDependencyParser {
            dependency_keys: &["dependencies", "peerDependencies", "optionalDependencies"],
            dev_keys: &["devDependencies"],
            ignored: &[],
        }),
        "composer.json" => Box::new(JsonDependencyParser {
            dependency_keys: &["require"],
            dev_keys: &["require-dev"],
            ignored: &["php"],
        }),
        "Cargo.toml" => Box::new(TomlDependencyParser {
            dependency_keys: &[&["dependencies"], &["build-dependencies"]],
            dev_keys: &[&["dev-dependencies"]],
        }),
        "Pipfile" => Box::new(TomlDependencyParser {
            dependency_keys: &[&["packages"]],
            dev_keys: &[&["dev-packages"]],
        }),
        "pyproject.toml" => Box::new(PyprojectParser),
        "requirements.txt" => Box::new(RequirementsParser),
        "go.mod" => Box::new(GoModParser),
        "Gemfile" => Box::new(GemfileParser),
        "pom.xml" => Box::new(PomParser),
        "build.gradle" | "build.gradle.kts" => Box::new(GradleParser),
        _ => return None,
    };
    Some(parser)
}

struct JsonDependencyParser {
    dependency_keys: &'static [&'static str],
    dev_keys: &'static [&'static str],
    ignored: &'static [&'static str],
}

impl JsonDependencyParser {
    fn collect(&self, parsed: &serde_json::Value, keys: &[&str]) -> DependencyTable {
        let mut table = DependencyTable::new();
        for key in keys {
            let Some(section) = parsed.get(key).and_then(|v| v.as_object()) else {
                continue;
            };
            for (name, version) in section {
                if self.ignored.contains(&name.as_str()) {
                    continue;
                }
                let version = version
                    .as_str()
                    .map(String::from)
                    .unwrap_or_else(|| version.to_string());
                table.entry(name.clone()).or_insert(version);
            }
        }
        table
    }
}

impl DependencyParser for JsonDependencyParser {
    fn parse(&self, content: &str) -> Result<ParsedDependencies, String> {
        let parsed: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
        Ok(ParsedDependencies {
            dependencies: self.collect(&parsed, self.dependency_keys),
            dev_dependencies: Some(self.collect(&parsed, self.dev_keys)),
        })
    }
}

/// Tables addressed by key path, e.g. `["tool", "poetry", "dependencies"]`
struct TomlDependencyParser {
    dependency_keys: &'static [&'static [&'static str]],
    dev_keys: &'static [&'static [&'static str]],
}

fn toml_table<'v>(root: &'v toml::Value, path: &[&str]) -> Option<&'v toml::value::Table> {
    path.iter()
        .try_fold(root, |value, key| value.get(key))
        .and_then(|v| v.as_table())
}

/// `"1.0"`, `{ version = "1.0" }`, `{ git = "..." }` or `{ path = "..." }`
fn toml_version(value: &toml::Value) -> String {
    if let Some(version) = value.as_str() {
        return version.to_string();
    }
    ["version", "git", "path"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .unwrap_or(ANY_VERSION)
        .to_string()
}

fn collect_toml(root: &toml::Value, paths: &[&[&str]], skip: &[&str]) -> DependencyTable {
    let mut table = DependencyTable::new();
    for path in paths {
        let Some(section) = toml_table(root, path) else {
            continue;
        };
        for (name, value) in section {
            if !skip.contains(&name.as_str()) {
                table.entry(name.clone()).or_insert_with(|| toml_version(value));
            }
        }
    }
    table
}

impl DependencyParser for TomlDependencyParser {
    fn parse(&self, content: &str) -> Result<ParsedDependencies, String> {
        let parsed: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;
        Ok(ParsedDependencies {
            dependencies: collect_toml(&parsed, self.dependency_keys, &[]),
            dev_dependencies: Some(collect_toml(&parsed, self.dev_keys, &[])),
        })
    }
}

/// PEP 621 `[project]` arrays plus Poetry tables
struct PyprojectParser;

impl DependencyParser for PyprojectParser {
    fn parse(&self, content: &str) -> Result<ParsedDependencies, String> {
        let parsed: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;

        let mut dependencies = collect_toml(&parsed, &[&["tool", "poetry", "dependencies"]], &["python"]);
        let project_deps = parsed
            .get("project")
            .and_then(|p| p.get("dependencies"))
            .and_then(|d| d.as_array());
        for requirement in project_deps.into_iter().flatten().filter_map(|r| r.as_str()) {
            if let Some((name, version)) = parse_requirement(requirement) {
                dependencies.entry(name).or_insert(version);
            }
        }

        let mut dev = collect_toml(
            &parsed,
            &[
                &["tool", "poetry", "group", "dev", "dependencies"],
                &["tool", "poetry", "dev-dependencies"],
            ],
            &[],
        );
        let optional_dev = parsed
            .get("project")
            .and_then(|p| p.get("optional-dependencies"))
            .and_then(|o| o.get("dev"))
            .and_then(|d| d.as_array());
        for requirement in optional_dev.into_iter().flatten().filter_map(|r| r.as_str()) {
            if let Some((name, version)) = parse_requirement(requirement) {
                dev.entry(name).or_insert(version);
            }
        }

        Ok(ParsedDependencies {
            dependencies,
            dev_dependencies: Some(dev),
        })
    }
}

/// `requests[socks]>=2.31 ; python_version > "3.8"` -> `("requests", ">=2.31")`
fn parse_requirement(line: &str) -> Option<(String, String)> {
    let line = line.split(';').next().unwrap_or_default().trim();
    if line.is_empty() {
        return None;
    }
    let split = line.find(|c: char| "=<>!~ ".contains(c)).unwrap_or(line.len());
    let (name, spec) = line.split_at(split);
    let name = name.split('[').next().unwrap_or_default().trim();
    if name.is_empty() {
        return None;
    }
    let spec = spec.trim();
    Some((
        name.to_string(),
        if spec.is_empty() { ANY_VERSION.to_string() } else { spec.to_string() },
    ))
}

struct RequirementsParser;

impl DependencyParser for RequirementsParser {
    fn parse(&self, content: &str) -> Result<ParsedDependencies, String> {
        let dependencies = content
            .lines()
            .map(|line| line.split(" #").next().unwrap_or_default().trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
            .filter_map(parse_requirement)
            .collect();
        Ok(ParsedDependencies {
            dependencies,
            dev_dependencies: None,
        })
    }
}

struct GoModParser;

impl DependencyParser for GoModParser {
    fn parse(&self, content: &str) -> Result<ParsedDependencies, String> {
        let mut dependencies = DependencyTable::new();
        let mut in_block = false;

        for line in content.lines() {
            let line = line.split("//").next().unwrap_or_default().trim();
            let entry = if in_block {
                if line == ")" {
                    in_block = false;
                    continue;
                }
                line
            } else if let Some(rest) = line.strip_prefix("require") {
                let rest = rest.trim();
                if rest == "(" {
                    in_block = true;
                    continue;
                }
                rest
            } else {
                continue;
            };

            let mut parts = entry.split_whitespace();
            if let (Some(module), Some(version)) = (parts.next(), parts.next()) {
                dependencies.insert(module.to_string(), version.to_string());
            }
        }

        Ok(ParsedDependencies {
            dependencies,
            dev_dependencies: None,
        })
    }
}

struct GemfileParser;

impl DependencyParser for GemfileParser {
    fn parse(&self, content: &str) -> Result<ParsedDependencies, String> {
        let gem = Regex::new(r#"(?m)^\s*gem\s+['"]([^'"]+)['"](?:\s*,\s*['"]([^'"]+)['"])?"#)
            .map_err(|e| e.to_string())?;
        let dependencies = gem
            .captures_iter(content)
            .map(|caps| {
                let version = caps.get(2).map_or(ANY_VERSION, |m| m.as_str());
                (caps[1].to_string(), version.to_string())
            })
            .collect();
        Ok(ParsedDependencies {
            dependencies,
            dev_dependencies: None,
        })
    }
}

/// Direct `<project><dependencies>` entries; `test` scope counts as dev
struct PomParser;

impl DependencyParser for PomParser {
    fn parse(&self, content: &str) -> Result<ParsedDependencies, String> {
        let doc = Document::parse(content).map_err(|e| e.to_string())?;
        let mut dependencies = DependencyTable::new();
        let mut dev = DependencyTable::new();

        let sections = doc
            .root_element()
            .children()
            .filter(|n| n.has_tag_name("dependencies"));
        for dependency in sections.flat_map(|s| s.children()).filter(|n| n.has_tag_name("dependency")) {
            let field = |tag: &str| {
                dependency
                    .children()
                    .find(|n| n.has_tag_name(tag))
                    .and_then(|n| n.text())
                    .map(|t| t.trim().to_string())
            };
            let (Some(group), Some(artifact)) = (field("groupId"), field("artifactId")) else {
                continue;
            };
            let version = field("version").unwrap_or_else(|| ANY_VERSION.to_string());
            let table = if field("scope").as_deref() == Some("test") {
                &mut dev
            } else {
                &mut dependencies
            };
            table.insert(format!("{group}:{artifact}"), version);
        }

        Ok(ParsedDependencies {
            dependencies,
            dev_dependencies: Some(dev),
        })
    }
}

/// `implementation("g:a:v")` and `testImplementation 'g:a:v'` style declarations
struct GradleParser;

impl DependencyParser for GradleParser {
    fn parse(&self, content: &str) -> Result<ParsedDependencies, String> {
        let declaration = Regex::new(
            r#"(?m)^\s*(\w+)\s*\(?\s*['"]([^:'"\s]+):([^:'"\s]+)(?::([^'"\s]+))?['"]"#,
        )
        .map_err(|e| e.to_string())?;

        let mut dependencies = DependencyTable::new();
        let mut dev = DependencyTable::new();
        for caps in declaration.captures_iter(content) {
            let configuration = &caps[1];
            let table = if configuration.starts_with("test") {
                &mut dev
            } else if matches!(
                configuration,
                "implementation" | "api" | "compileOnly" | "runtimeOnly" | "compile" | "annotationProcessor" | "kapt"
            ) {
                &mut dependencies
            } else {
                continue;
            };
            let version = caps.get(4).map_or(ANY_VERSION, |m| m.as_str());
            table.insert(format!("{}:{}", &caps[2], &caps[3]), version.to_string());
        }

        Ok(ParsedDependencies {
            dependencies,
            dev_dependencies: Some(dev),
        })
    }
}

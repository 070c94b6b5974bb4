//! Maven and Gradle manifest analysis

use super::{capture_first, framework, ManifestDetails};
use crate::stack::{Ecosystem, PackageManagerId};
use regex::Regex;
use std::path::Path;

pub(super) fn analyze_pom(content: &str) -> ManifestDetails {
    // The <parent> block repeats artifactId/version of the parent project.
    let own = Regex::new(r"(?s)<parent>.*?</parent>")
        .map(|re| re.replace(content, "").into_owned())
        .unwrap_or_else(|_| content.to_string());

    ManifestDetails {
        name: capture_first(r"<artifactId>\s*([^<]+?)\s*</artifactId>", &own),
        version: capture_first(r"<version>\s*([^<]+?)\s*</version>", &own),
        framework: framework::detect_in_content(Ecosystem::JavaMaven, content),
        package_manager: Some(PackageManagerId::Maven),
        ..Default::default()
    }
}

pub(super) fn analyze_gradle(dir: &Path, content: &str) -> ManifestDetails {
    const ROOT_PROJECT: &str = r#"rootProject\.name\s*=\s*['"]([^'"]+)['"]"#;

    let name = ["settings.gradle", "settings.gradle.kts"]
        .iter()
        .filter_map(|file| std::fs::read_to_string(dir.join(file)).ok())
        .find_map(|settings| capture_first(ROOT_PROJECT, &settings))
        .or_else(|| capture_first(ROOT_PROJECT, content));

    ManifestDetails {
        name,
        version: capture_first(r#"(?m)^\s*version\s*=\s*['"]([^'"]+)['"]"#, content),
        framework: framework::detect_in_content(Ecosystem::JavaGradle, content),
        package_manager: Some(PackageManagerId::Gradle),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_pom_skips_parent_block() {
        let pom = r#"<project>
  <parent>
    <groupId>org.springframework.boot</groupId>
    <artifactId>spring-boot-starter-parent</artifactId>
    <version>3.2.0</version>
  </parent>
  <artifactId>orders</artifactId>
  <version>1.4.0</version>
</project>"#;
        let details = analyze_pom(pom);
        assert_eq!(details.name.as_deref(), Some("orders"));
        assert_eq!(details.version.as_deref(), Some("1.4.0"));
        assert_eq!(details.framework.as_deref(), Some("Spring Boot"));
    }

    #[test]
    fn test_gradle_name_from_settings() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("settings.gradle"),
            "rootProject.name = 'billing'\n",
        )
        .unwrap();
        let details = analyze_gradle(dir.path(), "plugins { id 'java' }\nversion = '0.9.1'\n");
        assert_eq!(details.name.as_deref(), Some("billing"));
        assert_eq!(details.version.as_deref(), Some("0.9.1"));
    }

    #[test]
    fn test_gradle_without_settings() {
        let dir = TempDir::new().unwrap();
        let details = analyze_gradle(dir.path(), "apply plugin: 'java'\n");
        assert_eq!(details.name, None);
        assert_eq!(details.package_manager, Some(PackageManagerId::Gradle));
    }
}

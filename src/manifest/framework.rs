//! Framework detection by keyword
//!
//! Each list is ordered: meta-frameworks come before the libraries they are
//! built on, so the first hit is the most specific one.

use crate::stack::Ecosystem;

const NODE_FRAMEWORKS: &[(&str, &str)] = &[
    ("next", "Next.js"),
    ("nuxt", "Nuxt"),
    ("@remix-run/react", "Remix"),
    ("gatsby", "Gatsby"),
    ("@sveltejs/kit", "SvelteKit"),
    ("astro", "Astro"),
    ("@angular/core", "Angular"),
    ("@nestjs/core", "NestJS"),
    ("electron", "Electron"),
    ("svelte", "Svelte"),
    ("vue", "Vue"),
    ("react", "React"),
    ("express", "Express"),
    ("fastify", "Fastify"),
    ("koa", "Koa"),
    ("hono", "Hono"),
    ("vite", "Vite"),
];

const PYTHON_FRAMEWORKS: &[(&str, &str)] = &[
    ("django", "Django"),
    ("fastapi", "FastAPI"),
    ("flask", "Flask"),
    ("streamlit", "Streamlit"),
];

const RUBY_FRAMEWORKS: &[(&str, &str)] = &[
    ("rails", "Rails"),
    ("hanami", "Hanami"),
    ("sinatra", "Sinatra"),
];

const PHP_FRAMEWORKS: &[(&str, &str)] = &[
    ("laravel/framework", "Laravel"),
    ("symfony/framework-bundle", "Symfony"),
    ("slim/slim", "Slim"),
];

const JAVA_FRAMEWORKS: &[(&str, &str)] = &[
    ("spring-boot", "Spring Boot"),
    ("quarkus", "Quarkus"),
    ("micronaut", "Micronaut"),
    ("ktor", "Ktor"),
];

const GO_FRAMEWORKS: &[(&str, &str)] = &[
    ("github.com/gin-gonic/gin", "Gin"),
    ("github.com/labstack/echo", "Echo"),
    ("github.com/gofiber/fiber", "Fiber"),
    ("github.com/go-chi/chi", "Chi"),
];

const RUST_FRAMEWORKS: &[(&str, &str)] = &[
    ("actix-web", "Actix Web"),
    ("axum", "Axum"),
    ("rocket", "Rocket"),
    ("leptos", "Leptos"),
    ("tauri", "Tauri"),
];

/// First framework whose package name is among `dependencies`
pub fn detect_node(dependencies: &[&str]) -> Option<String> {
    NODE_FRAMEWORKS
        .iter()
        .find(|(package, _)| dependencies.contains(package))
        .map(|(_, framework)| framework.to_string())
}

/// First framework keyword found anywhere in the manifest text
pub fn detect_in_content(ecosystem: Ecosystem, content: &str) -> Option<String> {
    let keywords = match ecosystem {
        Ecosystem::Node => return None,
        Ecosystem::Python => PYTHON_FRAMEWORKS,
        Ecosystem::Ruby => RUBY_FRAMEWORKS,
        Ecosystem::Php => PHP_FRAMEWORKS,
        Ecosystem::JavaMaven | Ecosystem::JavaGradle => JAVA_FRAMEWORKS,
        Ecosystem::Go => GO_FRAMEWORKS,
        Ecosystem::Rust => RUST_FRAMEWORKS,
    };
    let content = content.to_lowercase();

    keywords
        .iter()
        .find(|(keyword, _)| content.contains(keyword))
        .map(|(_, framework)| framework.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_order_prefers_meta_framework() {
        assert_eq!(
            detect_node(&["react", "react-dom", "next"]),
            Some("Next.js".to_string())
        );
        assert_eq!(detect_node(&["react"]), Some("React".to_string()));
        assert_eq!(detect_node(&["lodash"]), None);
    }

    #[test]
    fn test_node_requires_exact_package_name() {
        assert_eq!(detect_node(&["react-router"]), None);
    }

    #[test]
    fn test_content_detection() {
        assert_eq!(
            detect_in_content(Ecosystem::Python, "Django>=4.2\npsycopg2\n"),
            Some("Django".to_string())
        );
        assert_eq!(
            detect_in_content(
                Ecosystem::Go,
                "module x\nrequire github.com/gin-gonic/gin v1.9.1\n"
            ),
            Some("Gin".to_string())
        );
        assert_eq!(
            detect_in_content(
                Ecosystem::JavaMaven,
                "<artifactId>spring-boot-starter-web</artifactId>"
            ),
            Some("Spring Boot".to_string())
        );
        assert_eq!(detect_in_content(Ecosystem::Rust, "[dependencies]\nserde = \"1\""), None);
    }
}

//! Framework detection over the catalog.
//!
//! One declarative signature table maps framework names to marker rules
//! (import statements, dependency entries, well-known file names), each
//! with a weight. [`scan_markers`] runs at catalog time and records
//! evidence tokens on `FileInfo.framework_markers`;
//! [`FrameworkDetector::detect`] aggregates those tokens per framework,
//! so multiple contributing files raise confidence without producing
//! duplicate entries.

use crate::configfiles::ConfigMetadata;
use crate::model::{FileInfo, Framework};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// An import/use statement in source code.
    Import,
    /// A dependency entry in a manifest.
    Dependency,
    /// A well-known file name.
    File,
}

impl MarkerKind {
    fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Import => "import",
            MarkerKind::Dependency => "dependency",
            MarkerKind::File => "file",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MarkerRule {
    pub framework: &'static str,
    pub kind: MarkerKind,
    pub pattern: &'static str,
    pub weight: f64,
}

const fn rule(
    framework: &'static str,
    kind: MarkerKind,
    pattern: &'static str,
    weight: f64,
) -> MarkerRule {
    MarkerRule {
        framework,
        kind,
        pattern,
        weight,
    }
}

/// The signature table. Adding a framework is a data change.
pub const FRAMEWORK_SIGNATURES: &[MarkerRule] = &[
    // Python
    rule("django", MarkerKind::Import, "django", 0.5),
    rule("django", MarkerKind::Dependency, "django", 0.6),
    rule("django", MarkerKind::File, "manage.py", 0.4),
    rule("flask", MarkerKind::Import, "flask", 0.5),
    rule("flask", MarkerKind::Dependency, "flask", 0.6),
    rule("fastapi", MarkerKind::Import, "fastapi", 0.5),
    rule("fastapi", MarkerKind::Dependency, "fastapi", 0.6),
    // JavaScript / TypeScript
    rule("express", MarkerKind::Import, "express", 0.5),
    rule("express", MarkerKind::Dependency, "express", 0.6),
    rule("react", MarkerKind::Import, "react", 0.4),
    rule("react", MarkerKind::Dependency, "react", 0.6),
    rule("nextjs", MarkerKind::Dependency, "next", 0.6),
    rule("nextjs", MarkerKind::File, "next.config.js", 0.5),
    rule("nextjs", MarkerKind::File, "next.config.mjs", 0.5),
    rule("vue", MarkerKind::Import, "vue", 0.4),
    rule("vue", MarkerKind::Dependency, "vue", 0.6),
    // JVM
    rule("spring-boot", MarkerKind::Import, "org.springframework", 0.5),
    rule("spring-boot", MarkerKind::Dependency, "spring-boot-starter", 0.6),
    // Ruby
    rule("rails", MarkerKind::Dependency, "rails", 0.6),
    rule("rails", MarkerKind::File, "config.ru", 0.3),
    // Rust
    rule("axum", MarkerKind::Import, "axum", 0.5),
    rule("axum", MarkerKind::Dependency, "axum", 0.6),
    rule("actix-web", MarkerKind::Import, "actix_web", 0.5),
    rule("actix-web", MarkerKind::Dependency, "actix-web", 0.6),
    // Go
    rule("gin", MarkerKind::Import, "github.com/gin-gonic/gin", 0.6),
];

/// Manifest files whose dependency entries are scanned for markers.
const DEPENDENCY_MANIFESTS: &[&str] = &[
    "package.json",
    "requirements.txt",
    "pyproject.toml",
    "Cargo.toml",
    "Gemfile",
    "go.mod",
    "pom.xml",
];

/// Extracts framework evidence tokens from one file at catalog time.
///
/// Tokens have the shape `framework:kind`, e.g. `django:import`. The
/// detector later maps tokens back to table weights.
pub fn scan_markers(filename: &str, content: &str) -> Vec<String> {
    let mut markers = Vec::new();

    for rule in FRAMEWORK_SIGNATURES {
        let matched = match rule.kind {
            MarkerKind::File => filename == rule.pattern,
            MarkerKind::Dependency => {
                DEPENDENCY_MANIFESTS.contains(&filename)
                    && manifest_declares(filename, content, rule.pattern)
            }
            MarkerKind::Import => import_lines(content)
                .any(|line| line_imports(line, rule.pattern)),
        };

        if matched {
            let token = format!("{}:{}", rule.framework, rule.kind.as_str());
            if !markers.contains(&token) {
                markers.push(token);
            }
        }
    }

    markers
}

/// Checks whether a manifest declares a dependency on `name`.
fn manifest_declares(filename: &str, content: &str, name: &str) -> bool {
    match filename {
        "package.json" => {
            let Ok(value) = serde_json::from_str::<serde_json::Value>(content) else {
                return false;
            };
            ["dependencies", "devDependencies"].iter().any(|section| {
                value
                    .get(section)
                    .and_then(|deps| deps.as_object())
                    .map(|deps| deps.contains_key(name))
                    .unwrap_or(false)
            })
        }
        "requirements.txt" => content.lines().any(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return false;
            }
            let dep = line
                .split(['=', '>', '<', '~', '!', ';', '['])
                .next()
                .unwrap_or("")
                .trim();
            dep.eq_ignore_ascii_case(name)
        }),
        "Cargo.toml" => {
            let Ok(value) = content.parse::<toml::Value>() else {
                return false;
            };
            ["dependencies", "dev-dependencies"].iter().any(|section| {
                value
                    .get(section)
                    .and_then(|deps| deps.as_table())
                    .map(|deps| deps.contains_key(name))
                    .unwrap_or(false)
            })
        }
        "Gemfile" => content.lines().any(|line| {
            let line = line.trim();
            line.starts_with(&format!("gem '{}'", name))
                || line.starts_with(&format!("gem \"{}\"", name))
        }),
        "go.mod" => content
            .lines()
            .any(|line| line.trim().starts_with(name) || line.contains(&format!("\t{}", name))),
        // pyproject.toml and pom.xml dependency names appear verbatim;
        // a substring scan is tolerant of both layouts.
        "pyproject.toml" | "pom.xml" => content.contains(name),
        _ => false,
    }
}

/// Lines that look like import statements, any language.
fn import_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().map(str::trim).filter(|line| {
        line.starts_with("import ")
            || line.starts_with("from ")
            || line.starts_with("use ")
            || line.starts_with("pub use ")
            || line.contains("require(")
    })
}

/// True when an import-ish line references `pattern` as a module name.
fn line_imports(line: &str, pattern: &str) -> bool {
    line.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.' || c == '/' || c == '-'))
        .any(|token| {
            token == pattern
                || token.starts_with(&format!("{}.", pattern))
                || token.starts_with(&format!("{}::", pattern))
        })
        || line.contains(&format!("'{}'", pattern))
        || line.contains(&format!("\"{}\"", pattern))
        || line.contains(&format!("use {}::", pattern))
}

pub struct FrameworkDetector;

impl FrameworkDetector {
    /// Aggregates marker evidence into one [`Framework`] per name.
    ///
    /// Confidence is the sum of contributing marker weights across all
    /// evidencing files, capped at 1.0. A version is attached only when
    /// parsed config metadata names one for the framework's dependency
    /// marker.
    pub fn detect(
        files: &BTreeMap<String, FileInfo>,
        configs: &[ConfigMetadata],
    ) -> Vec<Framework> {
        let mut aggregated: BTreeMap<String, Framework> = BTreeMap::new();

        for (path, info) in files {
            for token in &info.framework_markers {
                let Some((name, kind)) = token.split_once(':') else {
                    continue;
                };
                let Some(weight) = marker_weight(name, kind) else {
                    continue;
                };

                let entry = aggregated
                    .entry(name.to_string())
                    .or_insert_with(|| Framework {
                        name: name.to_string(),
                        version: None,
                        confidence: 0.0,
                        files: Default::default(),
                    });
                // framework_markers is a set, so each (file, kind) pair
                // contributes exactly once.
                entry.files.insert(path.clone());
                entry.confidence = (entry.confidence + weight).min(1.0);
            }
        }

        let mut frameworks: Vec<Framework> = aggregated.into_values().collect();

        for framework in &mut frameworks {
            framework.version = framework_version(&framework.name, configs);
        }

        frameworks.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        frameworks
    }
}

fn marker_weight(framework: &str, kind: &str) -> Option<f64> {
    FRAMEWORK_SIGNATURES
        .iter()
        .filter(|r| r.framework == framework && r.kind.as_str() == kind)
        .map(|r| r.weight)
        .next()
}

fn framework_version(framework: &str, configs: &[ConfigMetadata]) -> Option<String> {
    let dependency_patterns: Vec<&str> = FRAMEWORK_SIGNATURES
        .iter()
        .filter(|r| r.framework == framework && r.kind == MarkerKind::Dependency)
        .map(|r| r.pattern)
        .collect();

    for config in configs {
        for dep in &config.dependencies {
            if dependency_patterns
                .iter()
                .any(|p| dep.name.eq_ignore_ascii_case(p))
            {
                if let Some(version) = &dep.version {
                    return Some(version.clone());
                }
            }
        }
    }
    None
}

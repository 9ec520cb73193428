//! Tolerant parsing of recognized configuration files.
//!
//! Each parser extracts what it can — dependency lists, declared entry
//! points, package name/description — and a malformed or unrecognized
//! file contributes nothing rather than aborting the pipeline. The file
//! stays cataloged as CONFIG regardless of parse success.

use crate::model::{FileInfo, FileType};
use crate::scan::RawFileRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyEntry {
    pub name: String,
    pub version: Option<String>,
}

/// Structured fragment extracted from one config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    pub path: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub dependencies: Vec<DependencyEntry>,
    pub entry_points: Vec<String>,
}

impl ConfigMetadata {
    fn empty(path: &str) -> Self {
        Self {
            path: path.to_string(),
            name: None,
            description: None,
            dependencies: Vec::new(),
            entry_points: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.dependencies.is_empty()
            && self.entry_points.is_empty()
    }
}

pub struct ConfigFileParser;

impl ConfigFileParser {
    /// Parses every cataloged CONFIG file with readable content.
    pub fn parse(
        records: &[RawFileRecord],
        files: &BTreeMap<String, FileInfo>,
    ) -> Vec<ConfigMetadata> {
        let mut results = Vec::new();

        for record in records {
            let Some(info) = files.get(&record.path) else {
                continue;
            };
            if info.file_type != FileType::Config {
                continue;
            }
            let Some(content) = &record.content else {
                continue;
            };

            let parsed = match info.name.as_str() {
                "package.json" => parse_package_json(&record.path, content),
                "Cargo.toml" => parse_cargo_toml(&record.path, content),
                "pyproject.toml" => parse_pyproject(&record.path, content),
                "requirements.txt" | "requirements-dev.txt" => {
                    Some(parse_requirements(&record.path, content))
                }
                "go.mod" => Some(parse_go_mod(&record.path, content)),
                "pom.xml" => parse_pom_xml(&record.path, content),
                "docker-compose.yml" | "docker-compose.yaml" => {
                    parse_docker_compose(&record.path, content)
                }
                _ => None,
            };

            match parsed {
                Some(metadata) if !metadata.is_empty() => results.push(metadata),
                Some(_) => {}
                None => debug!(path = %record.path, "Config file yielded no metadata"),
            }
        }

        results
    }
}

fn parse_package_json(path: &str, content: &str) -> Option<ConfigMetadata> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    let mut metadata = ConfigMetadata::empty(path);

    metadata.name = value.get("name").and_then(|v| v.as_str()).map(String::from);
    metadata.description = value
        .get("description")
        .and_then(|v| v.as_str())
        .map(String::from);

    for section in ["dependencies", "devDependencies"] {
        if let Some(deps) = value.get(section).and_then(|v| v.as_object()) {
            for (name, version) in deps {
                metadata.dependencies.push(DependencyEntry {
                    name: name.clone(),
                    version: version.as_str().map(clean_semver),
                });
            }
        }
    }

    if let Some(main) = value.get("main").and_then(|v| v.as_str()) {
        metadata.entry_points.push(main.to_string());
    }
    match value.get("bin") {
        Some(serde_json::Value::String(bin)) => metadata.entry_points.push(bin.clone()),
        Some(serde_json::Value::Object(bins)) => {
            for target in bins.values().filter_map(|v| v.as_str()) {
                metadata.entry_points.push(target.to_string());
            }
        }
        _ => {}
    }

    Some(metadata)
}

fn parse_cargo_toml(path: &str, content: &str) -> Option<ConfigMetadata> {
    let value: toml::Value = content.parse().ok()?;
    let mut metadata = ConfigMetadata::empty(path);

    if let Some(package) = value.get("package") {
        metadata.name = package.get("name").and_then(|v| v.as_str()).map(String::from);
        metadata.description = package
            .get("description")
            .and_then(|v| v.as_str())
            .map(String::from);
    }

    if let Some(deps) = value.get("dependencies").and_then(|v| v.as_table()) {
        for (name, spec) in deps {
            let version = match spec {
                toml::Value::String(v) => Some(v.clone()),
                toml::Value::Table(t) => t
                    .get("version")
                    .and_then(|v| v.as_str())
                    .map(String::from),
                _ => None,
            };
            metadata.dependencies.push(DependencyEntry {
                name: name.clone(),
                version,
            });
        }
    }

    if let Some(bins) = value.get("bin").and_then(|v| v.as_array()) {
        for bin in bins {
            if let Some(bin_path) = bin.get("path").and_then(|v| v.as_str()) {
                metadata.entry_points.push(bin_path.to_string());
            }
        }
    }

    Some(metadata)
}

fn parse_pyproject(path: &str, content: &str) -> Option<ConfigMetadata> {
    let value: toml::Value = content.parse().ok()?;
    let mut metadata = ConfigMetadata::empty(path);

    if let Some(project) = value.get("project") {
        metadata.name = project.get("name").and_then(|v| v.as_str()).map(String::from);
        metadata.description = project
            .get("description")
            .and_then(|v| v.as_str())
            .map(String::from);

        if let Some(deps) = project.get("dependencies").and_then(|v| v.as_array()) {
            for requirement in deps.iter().filter_map(|v| v.as_str()) {
                metadata.dependencies.push(parse_requirement_line(requirement));
            }
        }
        if let Some(scripts) = project.get("scripts").and_then(|v| v.as_table()) {
            for target in scripts.values().filter_map(|v| v.as_str()) {
                metadata.entry_points.push(target.to_string());
            }
        }
    }

    // Poetry layout predates PEP 621 and still shows up in the wild.
    if let Some(deps) = value
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("dependencies"))
        .and_then(|v| v.as_table())
    {
        for (name, spec) in deps {
            if name == "python" {
                continue;
            }
            metadata.dependencies.push(DependencyEntry {
                name: name.clone(),
                version: spec.as_str().map(clean_semver),
            });
        }
    }

    Some(metadata)
}

fn parse_requirements(path: &str, content: &str) -> ConfigMetadata {
    let mut metadata = ConfigMetadata::empty(path);

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
            continue;
        }
        metadata.dependencies.push(parse_requirement_line(line));
    }

    metadata
}

/// `name==1.2.3` / `name>=2,<3` / `name[extra]~=1.0` -> name + version.
fn parse_requirement_line(line: &str) -> DependencyEntry {
    let name = line
        .split(['=', '>', '<', '~', '!', ';', '[', ' '])
        .next()
        .unwrap_or(line)
        .trim()
        .to_string();
    let version = line
        .split_once("==")
        .map(|(_, v)| v.split([',', ';', ' ']).next().unwrap_or(v).trim().to_string())
        .filter(|v| !v.is_empty());
    DependencyEntry { name, version }
}

fn parse_go_mod(path: &str, content: &str) -> ConfigMetadata {
    let mut metadata = ConfigMetadata::empty(path);
    let mut in_require = false;

    for line in content.lines() {
        let trimmed = line.trim();

        if let Some(module) = trimmed.strip_prefix("module ") {
            metadata.name = Some(module.trim().to_string());
            continue;
        }
        if trimmed.starts_with("require (") {
            in_require = true;
            continue;
        }
        if in_require && trimmed == ")" {
            in_require = false;
            continue;
        }

        let requirement = if in_require {
            Some(trimmed)
        } else {
            trimmed.strip_prefix("require ").map(str::trim)
        };
        if let Some(req) = requirement {
            let mut parts = req.split_whitespace();
            if let Some(name) = parts.next() {
                if name.contains('/') || name.contains('.') {
                    metadata.dependencies.push(DependencyEntry {
                        name: name.to_string(),
                        version: parts.next().map(String::from),
                    });
                }
            }
        }
    }

    metadata
}

fn parse_pom_xml(path: &str, content: &str) -> Option<ConfigMetadata> {
    let doc = roxmltree::Document::parse(content).ok()?;
    let mut metadata = ConfigMetadata::empty(path);

    let root = doc.root_element();
    metadata.name = child_text(&root, "artifactId");
    metadata.description = child_text(&root, "description");

    for dependency in doc
        .descendants()
        .filter(|n| n.has_tag_name("dependency"))
    {
        let Some(artifact) = child_text(&dependency, "artifactId") else {
            continue;
        };
        metadata.dependencies.push(DependencyEntry {
            name: artifact,
            version: child_text(&dependency, "version"),
        });
    }

    Some(metadata)
}

fn child_text(node: &roxmltree::Node, tag: &str) -> Option<String> {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .and_then(|c| c.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Compose services pin deployment images; record them as dependencies.
fn parse_docker_compose(path: &str, content: &str) -> Option<ConfigMetadata> {
    let value: serde_yaml::Value = serde_yaml::from_str(content).ok()?;
    let mut metadata = ConfigMetadata::empty(path);

    let services = value.get("services")?.as_mapping()?;
    for (_, service) in services {
        let Some(image) = service.get("image").and_then(|v| v.as_str()) else {
            continue;
        };
        let (name, version) = match image.rsplit_once(':') {
            Some((name, tag)) if !tag.contains('/') => (name, Some(tag.to_string())),
            _ => (image, None),
        };
        metadata.dependencies.push(DependencyEntry {
            name: name.to_string(),
            version,
        });
    }

    Some(metadata)
}

/// Strips range operators npm-style specs carry (`^1.2.3` -> `1.2.3`).
fn clean_semver(spec: &str) -> String {
    spec.trim_start_matches(['^', '~', '=', 'v', '>', '<', ' '])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FileCataloger;

    fn record(path: &str, content: &str) -> RawFileRecord {
        RawFileRecord {
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap().to_string(),
            size: content.len() as u64,
            content: Some(content.to_string()),
            truncated: false,
        }
    }

    fn parse_one(path: &str, content: &str) -> Vec<ConfigMetadata> {
        let records = vec![record(path, content)];
        let files = FileCataloger::catalog(&records);
        ConfigFileParser::parse(&records, &files)
    }

    #[test]
    fn test_package_json() {
        let results = parse_one(
            "package.json",
            r#"{
  "name": "web-app",
  "description": "A web app",
  "main": "index.js",
  "dependencies": {"express": "^4.18.2"},
  "devDependencies": {"jest": "~29.0.0"}
}"#,
        );

        assert_eq!(results.len(), 1);
        let meta = &results[0];
        assert_eq!(meta.name.as_deref(), Some("web-app"));
        assert_eq!(meta.description.as_deref(), Some("A web app"));
        assert_eq!(meta.entry_points, vec!["index.js"]);
        assert!(meta
            .dependencies
            .iter()
            .any(|d| d.name == "express" && d.version.as_deref() == Some("4.18.2")));
        assert!(meta.dependencies.iter().any(|d| d.name == "jest"));
    }

    #[test]
    fn test_cargo_toml() {
        let results = parse_one(
            "Cargo.toml",
            concat!(
                "[package]\n",
                "name = \"svc\"\n",
                "description = \"A service\"\n",
                "\n",
                "[dependencies]\n",
                "tokio = { version = \"1.35\", features = [\"full\"] }\n",
                "serde = \"1.0\"\n",
                "\n",
                "[[bin]]\n",
                "name = \"svc\"\n",
                "path = \"src/main.rs\"\n",
            ),
        );

        let meta = &results[0];
        assert_eq!(meta.name.as_deref(), Some("svc"));
        assert!(meta
            .dependencies
            .iter()
            .any(|d| d.name == "tokio" && d.version.as_deref() == Some("1.35")));
        assert!(meta
            .dependencies
            .iter()
            .any(|d| d.name == "serde" && d.version.as_deref() == Some("1.0")));
        assert_eq!(meta.entry_points, vec!["src/main.rs"]);
    }

    #[test]
    fn test_requirements_txt() {
        let results = parse_one(
            "requirements.txt",
            "# web\nDjango==4.2.0\nrequests>=2.28\n-r extra.txt\n\ncelery[redis]~=5.3\n",
        );

        let meta = &results[0];
        let names: Vec<&str> = meta.dependencies.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Django", "requests", "celery"]);
        assert_eq!(meta.dependencies[0].version.as_deref(), Some("4.2.0"));
        assert_eq!(meta.dependencies[1].version, None);
    }

    #[test]
    fn test_pyproject_pep621() {
        let results = parse_one(
            "pyproject.toml",
            concat!(
                "[project]\n",
                "name = \"tool\"\n",
                "dependencies = [\"fastapi==0.100.0\", \"uvicorn\"]\n",
                "\n",
                "[project.scripts]\n",
                "tool = \"tool.cli:main\"\n",
            ),
        );

        let meta = &results[0];
        assert_eq!(meta.name.as_deref(), Some("tool"));
        assert!(meta
            .dependencies
            .iter()
            .any(|d| d.name == "fastapi" && d.version.as_deref() == Some("0.100.0")));
        assert_eq!(meta.entry_points, vec!["tool.cli:main"]);
    }

    #[test]
    fn test_go_mod() {
        let results = parse_one(
            "go.mod",
            concat!(
                "module example.com/svc\n",
                "\n",
                "go 1.21\n",
                "\n",
                "require (\n",
                "\tgithub.com/gin-gonic/gin v1.9.1\n",
                "\tgolang.org/x/sync v0.5.0\n",
                ")\n",
            ),
        );

        let meta = &results[0];
        assert_eq!(meta.name.as_deref(), Some("example.com/svc"));
        assert!(meta
            .dependencies
            .iter()
            .any(|d| d.name == "github.com/gin-gonic/gin" && d.version.as_deref() == Some("v1.9.1")));
    }

    #[test]
    fn test_pom_xml() {
        let results = parse_one(
            "pom.xml",
            concat!(
                "<project>\n",
                "  <artifactId>app</artifactId>\n",
                "  <dependencies>\n",
                "    <dependency>\n",
                "      <groupId>org.springframework.boot</groupId>\n",
                "      <artifactId>spring-boot-starter-web</artifactId>\n",
                "      <version>3.1.0</version>\n",
                "    </dependency>\n",
                "  </dependencies>\n",
                "</project>\n",
            ),
        );

        let meta = &results[0];
        assert_eq!(meta.name.as_deref(), Some("app"));
        assert!(meta
            .dependencies
            .iter()
            .any(|d| d.name == "spring-boot-starter-web" && d.version.as_deref() == Some("3.1.0")));
    }

    #[test]
    fn test_docker_compose() {
        let results = parse_one(
            "docker-compose.yml",
            concat!(
                "services:\n",
                "  db:\n",
                "    image: postgres:15\n",
                "  cache:\n",
                "    image: redis\n",
            ),
        );

        let meta = &results[0];
        assert!(meta
            .dependencies
            .iter()
            .any(|d| d.name == "postgres" && d.version.as_deref() == Some("15")));
        assert!(meta.dependencies.iter().any(|d| d.name == "redis"));
    }

    #[test]
    fn test_malformed_config_contributes_nothing() {
        let results = parse_one("package.json", "{not valid json");
        assert!(results.is_empty());
    }

    #[test]
    fn test_non_config_files_skipped() {
        let records = vec![record("src/main.py", "import os\n")];
        let files = FileCataloger::catalog(&records);
        assert!(ConfigFileParser::parse(&records, &files).is_empty());
    }

    #[test]
    fn test_unrecognized_config_skipped() {
        let results = parse_one("settings.ini", "[section]\nkey = value\n");
        assert!(results.is_empty());
    }
}

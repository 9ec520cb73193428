//! Structural and architectural pattern detection.
//!
//! Signature tables are declarative: each entry names required
//! manifests, extensions, or file types plus thresholds, and one
//! generic scorer evaluates them. Adding a pattern is a data change.
//! Architecture verdicts bias every tie toward `Unknown` — a false
//! structural claim is worse than admitting uncertainty.

use crate::model::{DirectoryInfo, DirectoryType, FileInfo, FileType, Pattern, ProjectType};
use std::collections::BTreeMap;

/// A project-structure signature: a manifest plus source files.
#[derive(Debug, Clone, Copy)]
pub struct ProjectRule {
    pub name: &'static str,
    /// Any one of these manifests present anywhere.
    pub manifests: &'static [&'static str],
    /// Source extensions the ecosystem uses.
    pub extensions: &'static [&'static str],
    pub min_source_files: usize,
    pub confidence: f64,
}

pub const PROJECT_PATTERNS: &[ProjectRule] = &[
    ProjectRule {
        name: "standard_python",
        manifests: &["requirements.txt", "pyproject.toml", "setup.py"],
        extensions: &["py"],
        min_source_files: 1,
        confidence: 0.8,
    },
    ProjectRule {
        name: "standard_node",
        manifests: &["package.json"],
        extensions: &["js", "jsx", "ts", "tsx", "mjs"],
        min_source_files: 1,
        confidence: 0.8,
    },
    ProjectRule {
        name: "standard_rust",
        manifests: &["Cargo.toml"],
        extensions: &["rs"],
        min_source_files: 1,
        confidence: 0.85,
    },
    ProjectRule {
        name: "standard_go",
        manifests: &["go.mod"],
        extensions: &["go"],
        min_source_files: 1,
        confidence: 0.85,
    },
    ProjectRule {
        name: "standard_maven",
        manifests: &["pom.xml"],
        extensions: &["java", "kt"],
        min_source_files: 1,
        confidence: 0.8,
    },
];

/// A file-population signature: enough files of one semantic type.
#[derive(Debug, Clone, Copy)]
pub struct FilePatternRule {
    pub name: &'static str,
    pub file_type: FileType,
    pub min_count: usize,
    pub confidence: f64,
}

pub const FILE_PATTERNS: &[FilePatternRule] = &[
    FilePatternRule {
        name: "configuration_files",
        file_type: FileType::Config,
        min_count: 1,
        confidence: 0.9,
    },
    FilePatternRule {
        name: "documentation_files",
        file_type: FileType::Doc,
        min_count: 1,
        confidence: 0.9,
    },
    FilePatternRule {
        name: "test_files",
        file_type: FileType::Test,
        min_count: 1,
        confidence: 0.9,
    },
];

/// Parents whose children are conventionally library modules, not
/// deployable services.
const MODULAR_PARENT_NAMES: &[&str] = &["packages", "modules", "libs", "crates"];

pub struct PatternDetector;

impl PatternDetector {
    /// Scores the repository's overall structural shape.
    pub fn detect_project_type(
        directories: &BTreeMap<String, DirectoryInfo>,
        files: &BTreeMap<String, FileInfo>,
    ) -> ProjectType {
        let micro = microservice_groups(directories, files) > 0;
        let mono = src_tree_dominates(directories, files);
        let modular = modular_parent_exists(directories, files);

        // Conflicting evidence is a tie, and ties go to Unknown.
        match (micro, mono) {
            (true, true) => ProjectType::Unknown,
            (true, false) => ProjectType::Microservices,
            (false, true) => ProjectType::Monolith,
            (false, false) if modular => ProjectType::Modular,
            _ => ProjectType::Unknown,
        }
    }

    /// Evaluates every signature table against the catalog.
    pub fn detect_patterns(
        directories: &BTreeMap<String, DirectoryInfo>,
        files: &BTreeMap<String, FileInfo>,
    ) -> Vec<Pattern> {
        let mut patterns = Vec::new();

        for rule in PROJECT_PATTERNS {
            if let Some(pattern) = score_project_rule(rule, files) {
                patterns.push(pattern);
            }
        }

        let project_type = Self::detect_project_type(directories, files);
        if project_type != ProjectType::Unknown {
            patterns.push(Pattern {
                name: project_type.as_str().to_string(),
                pattern_type: "architecture".to_string(),
                confidence: architecture_confidence(project_type, directories, files),
            });
        }

        for rule in FILE_PATTERNS {
            if let Some(pattern) = score_file_rule(rule, files) {
                patterns.push(pattern);
            }
        }

        patterns
    }
}

fn score_project_rule(
    rule: &ProjectRule,
    files: &BTreeMap<String, FileInfo>,
) -> Option<Pattern> {
    let has_manifest = files
        .values()
        .any(|f| rule.manifests.contains(&f.name.as_str()));
    if !has_manifest {
        return None;
    }

    let source_count = files
        .values()
        .filter(|f| {
            matches!(f.file_type, FileType::Source | FileType::Test)
                && rule.extensions.contains(&f.extension.as_str())
        })
        .count();
    if source_count < rule.min_source_files {
        return None;
    }

    Some(Pattern {
        name: rule.name.to_string(),
        pattern_type: "project_structure".to_string(),
        confidence: rule.confidence,
    })
}

fn score_file_rule(rule: &FilePatternRule, files: &BTreeMap<String, FileInfo>) -> Option<Pattern> {
    let count = files
        .values()
        .filter(|f| f.file_type == rule.file_type)
        .count();
    if count < rule.min_count {
        return None;
    }
    Some(Pattern {
        name: rule.name.to_string(),
        pattern_type: "files".to_string(),
        confidence: rule.confidence,
    })
}

/// A directory is service-like when it carries its own config file
/// directly and at least one source file somewhere beneath.
fn is_service_like(dir_path: &str, files: &BTreeMap<String, FileInfo>) -> bool {
    let prefix = format!("{}/", dir_path);

    let has_own_config = files.iter().any(|(path, info)| {
        info.file_type == FileType::Config
            && path
                .strip_prefix(&prefix)
                .map(|rest| !rest.contains('/'))
                .unwrap_or(false)
    });
    if !has_own_config {
        return false;
    }

    files.iter().any(|(path, info)| {
        info.file_type == FileType::Source && path.starts_with(&prefix)
    })
}

fn has_source_beneath(dir_path: &str, files: &BTreeMap<String, FileInfo>) -> bool {
    let prefix = format!("{}/", dir_path);
    files
        .iter()
        .any(|(path, info)| info.file_type == FileType::Source && path.starts_with(&prefix))
}

/// Counts sibling groups with >= 2 independent service-like members:
/// top-level directories, and children of any depth-1 parent that is
/// not a conventional module container.
fn microservice_groups(
    directories: &BTreeMap<String, DirectoryInfo>,
    files: &BTreeMap<String, FileInfo>,
) -> usize {
    let mut groups = 0;

    let top_level_services = directories
        .keys()
        .filter(|p| !p.contains('/'))
        .filter(|p| is_service_like(p, files))
        .count();
    if top_level_services >= 2 {
        groups += 1;
    }

    for parent in directories.values() {
        if parent.path.contains('/') {
            continue;
        }
        if MODULAR_PARENT_NAMES.contains(&parent.name.to_ascii_lowercase().as_str()) {
            continue;
        }
        let prefix = format!("{}/", parent.path);
        let service_children = directories
            .keys()
            .filter(|p| {
                p.strip_prefix(&prefix)
                    .map(|rest| !rest.contains('/'))
                    .unwrap_or(false)
            })
            .filter(|p| is_service_like(p, files))
            .count();
        if service_children >= 2 {
            groups += 1;
        }
    }

    groups
}

/// True when a single top-level `src` tree holds the strict majority of
/// all source files.
fn src_tree_dominates(
    directories: &BTreeMap<String, DirectoryInfo>,
    files: &BTreeMap<String, FileInfo>,
) -> bool {
    let Some(src) = directories.get("src") else {
        return false;
    };
    if src.dir_type != DirectoryType::Source {
        return false;
    }

    let total_source = files
        .values()
        .filter(|f| f.file_type == FileType::Source)
        .count();
    if total_source == 0 {
        return false;
    }

    let under_src = files
        .iter()
        .filter(|(path, info)| info.file_type == FileType::Source && path.starts_with("src/"))
        .count();

    under_src * 2 > total_source
}

/// True when a conventional module container holds >= 2 source-bearing
/// children.
fn modular_parent_exists(
    directories: &BTreeMap<String, DirectoryInfo>,
    files: &BTreeMap<String, FileInfo>,
) -> bool {
    directories.values().any(|parent| {
        if parent.path.contains('/') {
            return false;
        }
        if !MODULAR_PARENT_NAMES.contains(&parent.name.to_ascii_lowercase().as_str()) {
            return false;
        }
        let prefix = format!("{}/", parent.path);
        let source_children = directories
            .keys()
            .filter(|p| {
                p.strip_prefix(&prefix)
                    .map(|rest| !rest.contains('/'))
                    .unwrap_or(false)
            })
            .filter(|p| has_source_beneath(p, files))
            .count();
        source_children >= 2
    })
}

fn architecture_confidence(
    project_type: ProjectType,
    directories: &BTreeMap<String, DirectoryInfo>,
    files: &BTreeMap<String, FileInfo>,
) -> f64 {
    match project_type {
        ProjectType::Microservices => {
            let groups = microservice_groups(directories, files);
            (0.6 + 0.1 * groups as f64).min(0.9)
        }
        ProjectType::Monolith => 0.7,
        ProjectType::Modular => 0.6,
        ProjectType::Unknown => 0.0,
    }
}

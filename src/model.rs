//! The immutable data model produced by an analysis run.
//!
//! [`RepositoryStructure`] is the single value returned by
//! [`RepositoryAnalyzer::analyze`](crate::analyzer::RepositoryAnalyzer::analyze)
//! and the only object exposed to downstream consumers (report
//! generators, workflow adapters). Everything in this module is
//! serde-serializable so consumers can persist or transport results.
//!
//! Path keys in [`RepositoryStructure::files`] and
//! [`RepositoryStructure::directories`] are relative to `root_path`,
//! `/`-separated, and unique. `BTreeMap` keeps iteration and serialized
//! output deterministic.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Semantic classification of a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Source,
    Test,
    Doc,
    Config,
    Build,
    Unknown,
}

/// Semantic classification of a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryType {
    Source,
    Tests,
    Docs,
    Config,
    Build,
    Unknown,
}

/// Structural verdict for the repository as a whole.
///
/// Derived solely from the catalog, never guessed ahead of it. Ambiguous
/// layouts resolve to `Unknown` rather than the closest guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Monolith,
    Microservices,
    Modular,
    Unknown,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Monolith => "monolith",
            ProjectType::Microservices => "microservices",
            ProjectType::Modular => "modular",
            ProjectType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryInfo {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub dir_type: DirectoryType,
    pub purpose: String,
    /// Names of direct children (files and directories), sorted.
    pub children: Vec<String>,
    /// Count of files anywhere beneath this directory.
    pub file_count: usize,
    /// File-pattern names earned from direct children.
    pub patterns: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub path: String,
    pub extension: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub language: Option<String>,
    /// Framework evidence tokens collected at catalog time,
    /// e.g. `django:import` or `express:dependency`.
    pub framework_markers: BTreeSet<String>,
    /// Raw import targets in source order, resolved or not.
    pub imports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Framework {
    pub name: String,
    pub version: Option<String>,
    pub confidence: f64,
    /// Every file path that contributed evidence.
    pub files: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    /// `project_structure`, `architecture`, or `files`.
    #[serde(rename = "type")]
    pub pattern_type: String,
    pub confidence: f64,
}

/// A directed, weighted dependency edge between two cataloged files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    /// 1.0 for directly resolved edges, lower for fuzzy matches.
    pub strength: f64,
}

/// Summary metrics computed once at the end of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    pub name: String,
    pub description: String,
    pub primary_language: String,
    pub languages: BTreeSet<String>,
    pub frameworks: BTreeSet<String>,
    pub architecture_type: String,
    pub complexity_score: f64,
    pub documentation_coverage: f64,
    pub test_coverage_estimate: f64,
    pub entry_points: Vec<String>,
    pub configuration_files: Vec<String>,
}

/// The root aggregate: one immutable result per `analyze` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryStructure {
    pub source: String,
    pub root_path: PathBuf,
    pub project_type: ProjectType,
    pub frameworks: Vec<Framework>,
    pub directories: BTreeMap<String, DirectoryInfo>,
    pub files: BTreeMap<String, FileInfo>,
    pub patterns: Vec<Pattern>,
    pub relationships: Vec<Relationship>,
    pub metadata: RepositoryMetadata,
}

impl RepositoryStructure {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    pub fn has_framework(&self, name: &str) -> bool {
        self.frameworks.iter().any(|f| f.name == name)
    }
}

impl fmt::Display for RepositoryStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Repository: {}", self.metadata.name)?;
        writeln!(f, "Source: {}", self.source)?;
        writeln!(f, "Project type: {}", self.project_type.as_str())?;
        writeln!(
            f,
            "Files: {} across {} directories",
            self.files.len(),
            self.directories.len()
        )?;
        writeln!(f, "Primary language: {}", self.metadata.primary_language)?;
        if !self.frameworks.is_empty() {
            let names: Vec<&str> = self.frameworks.iter().map(|fw| fw.name.as_str()).collect();
            writeln!(f, "Frameworks: {}", names.join(", "))?;
        }
        Ok(())
    }
}

//! Directory classification and per-directory aggregation.

use crate::model::{DirectoryInfo, DirectoryType, FileInfo, FileType};
use crate::scan::RawDirRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Conventional directory names and their semantic type.
const DIRECTORY_NAMES: &[(&str, DirectoryType)] = &[
    ("src", DirectoryType::Source),
    ("lib", DirectoryType::Source),
    ("app", DirectoryType::Source),
    ("source", DirectoryType::Source),
    ("tests", DirectoryType::Tests),
    ("test", DirectoryType::Tests),
    ("spec", DirectoryType::Tests),
    ("__tests__", DirectoryType::Tests),
    ("docs", DirectoryType::Docs),
    ("doc", DirectoryType::Docs),
    ("documentation", DirectoryType::Docs),
    ("config", DirectoryType::Config),
    ("configs", DirectoryType::Config),
    ("conf", DirectoryType::Config),
    ("settings", DirectoryType::Config),
    ("build", DirectoryType::Build),
    ("scripts", DirectoryType::Build),
    ("ci", DirectoryType::Build),
    (".github", DirectoryType::Build),
];

pub struct DirectoryCataloger;

impl DirectoryCataloger {
    /// Builds the directory catalog from raw records and the already
    /// typed file catalog.
    pub fn catalog(
        records: &[RawDirRecord],
        files: &BTreeMap<String, FileInfo>,
    ) -> BTreeMap<String, DirectoryInfo> {
        let dir_paths: BTreeSet<&str> = records.iter().map(|r| r.path.as_str()).collect();

        records
            .iter()
            .map(|record| {
                let dir_type = type_for(&record.name);
                let info = DirectoryInfo {
                    name: record.name.clone(),
                    path: record.path.clone(),
                    dir_type,
                    purpose: purpose_for(dir_type).to_string(),
                    children: children_of(&record.path, &dir_paths, files),
                    file_count: count_files_beneath(&record.path, files),
                    patterns: local_patterns(&record.path, files),
                };
                (record.path.clone(), info)
            })
            .collect()
    }
}

fn type_for(name: &str) -> DirectoryType {
    let lowered = name.to_ascii_lowercase();
    DIRECTORY_NAMES
        .iter()
        .find(|(n, _)| *n == lowered)
        .map(|(_, t)| *t)
        .unwrap_or(DirectoryType::Unknown)
}

fn purpose_for(dir_type: DirectoryType) -> &'static str {
    match dir_type {
        DirectoryType::Source => "Application source code",
        DirectoryType::Tests => "Test suites",
        DirectoryType::Docs => "Project documentation",
        DirectoryType::Config => "Configuration",
        DirectoryType::Build => "Build and automation tooling",
        DirectoryType::Unknown => "",
    }
}

/// Direct children (subdirectories and files), sorted by name.
fn children_of(
    dir_path: &str,
    dir_paths: &BTreeSet<&str>,
    files: &BTreeMap<String, FileInfo>,
) -> Vec<String> {
    let prefix = format!("{}/", dir_path);
    let mut children = BTreeSet::new();

    for path in dir_paths {
        if let Some(rest) = path.strip_prefix(&prefix) {
            if !rest.contains('/') {
                children.insert(rest.to_string());
            }
        }
    }
    for path in files.keys() {
        if let Some(rest) = path.strip_prefix(&prefix) {
            if !rest.contains('/') {
                children.insert(rest.to_string());
            }
        }
    }

    children.into_iter().collect()
}

/// Files anywhere beneath the directory.
fn count_files_beneath(dir_path: &str, files: &BTreeMap<String, FileInfo>) -> usize {
    let prefix = format!("{}/", dir_path);
    files.keys().filter(|p| p.starts_with(&prefix)).count()
}

/// File-pattern names earned from direct children.
fn local_patterns(dir_path: &str, files: &BTreeMap<String, FileInfo>) -> BTreeSet<String> {
    let prefix = format!("{}/", dir_path);
    let mut patterns = BTreeSet::new();

    for (path, info) in files {
        let Some(rest) = path.strip_prefix(&prefix) else {
            continue;
        };
        if rest.contains('/') {
            continue;
        }
        match info.file_type {
            FileType::Test => {
                patterns.insert("test_files".to_string());
            }
            FileType::Config => {
                patterns.insert("configuration_files".to_string());
            }
            FileType::Doc => {
                patterns.insert("documentation_files".to_string());
            }
            _ => {}
        }
    }

    patterns
}

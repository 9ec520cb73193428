//! Best-effort import extraction.
//!
//! This is deliberately a regex/line-scan, not a parser front end: it
//! captures the common `import`/`require`/`use` statement shapes per
//! language and nothing more. Targets that cannot be resolved to a
//! repository file stay on `FileInfo.imports` for inspection; edge
//! building happens in [`relationships`].

pub mod relationships;

pub use relationships::RelationshipMapper;

use crate::model::{FileInfo, FileType};
use crate::scan::RawFileRecord;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

static PYTHON_FROM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*from\s+([\w\.]+)\s+import\s").expect("valid regex")
});
static PYTHON_IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*import\s+([\w\.]+)").expect("valid regex"));
static JS_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*import\s+(?:[\w{}\s,*$]+\s+from\s+)?['"]([^'"]+)['"]"#)
        .expect("valid regex")
});
static JS_REQUIRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid regex"));
static RUST_USE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:pub\s+)?use\s+([A-Za-z0-9_]+(?:::[A-Za-z0-9_]+)*)").expect("valid regex")
});
static RUST_MOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:pub\s+)?mod\s+([A-Za-z0-9_]+)\s*;").expect("valid regex")
});
static GO_IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*import\s+(?:\w+\s+)?"([^"]+)""#).expect("valid regex"));
static GO_BLOCK_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*(?:\w+\s+)?"([^"]+)"\s*$"#).expect("valid regex"));
static JAVA_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*import\s+(?:static\s+)?([\w\.]+)\s*;").expect("valid regex")
});

pub struct ImportAnalyzer;

impl ImportAnalyzer {
    /// Extracts raw import targets per file, in source order.
    ///
    /// Only source and test files with readable content are scanned;
    /// everything else maps to an empty sequence.
    pub fn analyze(
        records: &[RawFileRecord],
        files: &BTreeMap<String, FileInfo>,
    ) -> BTreeMap<String, Vec<String>> {
        let mut imports = BTreeMap::new();

        for record in records {
            let Some(info) = files.get(&record.path) else {
                continue;
            };
            if !matches!(info.file_type, FileType::Source | FileType::Test) {
                continue;
            }
            let Some(content) = &record.content else {
                continue;
            };
            let Some(language) = info.language.as_deref() else {
                continue;
            };

            let targets = extract_imports(language, content);
            if !targets.is_empty() {
                imports.insert(record.path.clone(), targets);
            }
        }

        imports
    }
}

/// Language-dispatched line scan. Unknown languages yield nothing.
pub fn extract_imports(language: &str, content: &str) -> Vec<String> {
    let mut targets = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |target: String| {
        if seen.insert(target.clone()) {
            targets.push(target);
        }
    };

    match language {
        "Python" => {
            for line in content.lines() {
                if let Some(cap) = PYTHON_FROM_RE.captures(line) {
                    push(cap[1].to_string());
                } else if let Some(cap) = PYTHON_IMPORT_RE.captures(line) {
                    push(cap[1].to_string());
                }
            }
        }
        "JavaScript" | "TypeScript" => {
            for line in content.lines() {
                if let Some(cap) = JS_IMPORT_RE.captures(line) {
                    push(cap[1].to_string());
                }
                for cap in JS_REQUIRE_RE.captures_iter(line) {
                    push(cap[1].to_string());
                }
            }
        }
        "Rust" => {
            for line in content.lines() {
                if let Some(cap) = RUST_USE_RE.captures(line) {
                    push(cap[1].to_string());
                } else if let Some(cap) = RUST_MOD_RE.captures(line) {
                    push(cap[1].to_string());
                }
            }
        }
        "Go" => {
            let mut in_block = false;
            for line in content.lines() {
                let trimmed = line.trim();
                if trimmed.starts_with("import (") {
                    in_block = true;
                    continue;
                }
                if in_block {
                    if trimmed == ")" {
                        in_block = false;
                        continue;
                    }
                    if let Some(cap) = GO_BLOCK_LINE_RE.captures(line) {
                        push(cap[1].to_string());
                    }
                    continue;
                }
                if let Some(cap) = GO_IMPORT_RE.captures(line) {
                    push(cap[1].to_string());
                }
            }
        }
        "Java" | "Kotlin" => {
            for line in content.lines() {
                if let Some(cap) = JAVA_IMPORT_RE.captures(line) {
                    push(cap[1].to_string());
                }
            }
        }
        _ => {}
    }

    targets
}

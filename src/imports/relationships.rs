//! Building the weighted relationship graph from extracted imports.
//!
//! Only targets that resolve to a repository file produce edges;
//! directly resolved edges carry strength 1.0, fuzzy stem matches 0.5.
//! Unresolved targets are dropped from the graph but survive on
//! `FileInfo.imports`.

use crate::model::{FileInfo, FileType, Relationship};
use std::collections::BTreeMap;

const JS_EXTENSIONS: &[&str] = &["js", "ts", "jsx", "tsx", "mjs"];

/// Minimum jaro-winkler similarity for a fuzzy stem match.
const FUZZY_THRESHOLD: f64 = 0.92;

pub struct RelationshipMapper;

impl RelationshipMapper {
    /// Emits one `import` relationship per resolved edge.
    pub fn map(
        files: &BTreeMap<String, FileInfo>,
        imports: &BTreeMap<String, Vec<String>>,
    ) -> Vec<Relationship> {
        let mut edges: BTreeMap<(String, String), f64> = BTreeMap::new();

        for (source, targets) in imports {
            for target in targets {
                let Some((resolved, strength)) = resolve(source, target, files) else {
                    continue;
                };
                if resolved == *source {
                    continue;
                }
                let entry = edges.entry((source.clone(), resolved)).or_insert(0.0);
                if strength > *entry {
                    *entry = strength;
                }
            }
        }

        edges
            .into_iter()
            .map(|((source, target), strength)| Relationship {
                source,
                target,
                rel_type: "import".to_string(),
                strength,
            })
            .collect()
    }
}

/// Best-effort resolution of one import target against the catalog.
fn resolve(
    source: &str,
    target: &str,
    files: &BTreeMap<String, FileInfo>,
) -> Option<(String, f64)> {
    if target.starts_with("./") || target.starts_with("../") {
        if let Some(path) = resolve_relative(source, target, files) {
            return Some((path, 1.0));
        }
        return None;
    }

    if target.starts_with("crate::") {
        if let Some(path) = resolve_rust_crate(target, files) {
            return Some((path, 1.0));
        }
    } else if !target.contains("::") && !target.contains('/') {
        if let Some(path) = resolve_python_module(source, target, files) {
            return Some((path, 1.0));
        }
        if let Some(path) = resolve_rust_sibling(source, target, files) {
            return Some((path, 1.0));
        }
    }

    resolve_fuzzy(target, files).map(|path| (path, 0.5))
}

/// `./utils` from `src/main.js` -> `src/utils.js` (with extension and
/// index fallbacks).
fn resolve_relative(
    source: &str,
    target: &str,
    files: &BTreeMap<String, FileInfo>,
) -> Option<String> {
    let base = parent_dir(source);
    let joined = join_relative(base, target)?;

    if files.contains_key(&joined) {
        return Some(joined);
    }
    for ext in JS_EXTENSIONS {
        let candidate = format!("{}.{}", joined, ext);
        if files.contains_key(&candidate) {
            return Some(candidate);
        }
    }
    for ext in JS_EXTENSIONS {
        let candidate = format!("{}/index.{}", joined, ext);
        if files.contains_key(&candidate) {
            return Some(candidate);
        }
    }
    // Python relative imports land here too.
    let candidate = format!("{}.py", joined);
    if files.contains_key(&candidate) {
        return Some(candidate);
    }
    None
}

/// Dotted Python modules: `pkg.helpers` -> `pkg/helpers.py`, package
/// roots, or a sibling module of the importing file.
fn resolve_python_module(
    source: &str,
    target: &str,
    files: &BTreeMap<String, FileInfo>,
) -> Option<String> {
    let rel = target.replace('.', "/");

    for candidate in [format!("{}.py", rel), format!("{}/__init__.py", rel)] {
        if files.contains_key(&candidate) {
            return Some(candidate);
        }
    }

    let base = parent_dir(source);
    if !base.is_empty() {
        for candidate in [
            format!("{}/{}.py", base, rel),
            format!("{}/{}/__init__.py", base, rel),
        ] {
            if files.contains_key(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// `crate::a::b` -> `src/a/b.rs`, `src/a/b/mod.rs`, or the enclosing
/// module when the tail segment is an item name.
fn resolve_rust_crate(target: &str, files: &BTreeMap<String, FileInfo>) -> Option<String> {
    let mut segments: Vec<&str> = target.split("::").skip(1).collect();

    while !segments.is_empty() {
        let rel = segments.join("/");
        for candidate in [format!("src/{}.rs", rel), format!("src/{}/mod.rs", rel)] {
            if files.contains_key(&candidate) {
                return Some(candidate);
            }
        }
        segments.pop();
    }
    None
}

/// `mod scanner;` -> sibling `scanner.rs` or `scanner/mod.rs`.
fn resolve_rust_sibling(
    source: &str,
    target: &str,
    files: &BTreeMap<String, FileInfo>,
) -> Option<String> {
    if !source.ends_with(".rs") {
        return None;
    }
    let base = parent_dir(source);
    let candidates = if base.is_empty() {
        [format!("{}.rs", target), format!("{}/mod.rs", target)]
    } else {
        [
            format!("{}/{}.rs", base, target),
            format!("{}/{}/mod.rs", base, target),
        ]
    };
    candidates.into_iter().find(|c| files.contains_key(c))
}

/// Unique best stem match among source/test files.
fn resolve_fuzzy(target: &str, files: &BTreeMap<String, FileInfo>) -> Option<String> {
    let stem = target
        .rsplit(['/', '.'])
        .next()
        .unwrap_or(target)
        .rsplit("::")
        .next()
        .unwrap_or(target);
    if stem.len() < 3 {
        return None;
    }

    let mut best: Option<(String, f64)> = None;
    let mut tied = false;

    for (path, info) in files {
        if !matches!(info.file_type, FileType::Source | FileType::Test) {
            continue;
        }
        let file_stem = info.name.rsplit_once('.').map(|(s, _)| s).unwrap_or(&info.name);
        let similarity = strsim::jaro_winkler(stem, file_stem);
        if similarity < FUZZY_THRESHOLD {
            continue;
        }
        match &best {
            Some((_, current)) if similarity < *current => {}
            Some((_, current)) if (similarity - current).abs() < f64::EPSILON => tied = true,
            _ => {
                best = Some((path.clone(), similarity));
                tied = false;
            }
        }
    }

    if tied {
        return None;
    }
    best.map(|(path, _)| path)
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Joins a `./`-style specifier onto a base directory, resolving `..`
/// components; `None` when the target escapes the repository root.
fn join_relative(base: &str, spec: &str) -> Option<String> {
    let mut parts: Vec<&str> = if base.is_empty() {
        Vec::new()
    } else {
        base.split('/').collect()
    };

    for component in spec.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

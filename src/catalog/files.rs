//! File classification: exact-name rules first, then test markers, then
//! extensions, defaulting to Unknown so unrecognized files never skew
//! downstream metrics.

use crate::detect::frameworks;
use crate::model::{FileInfo, FileType};
use crate::scan::RawFileRecord;
use std::collections::BTreeMap;

/// Exact filenames classified as documentation.
const DOC_FILENAMES: &[&str] = &[
    "README",
    "README.md",
    "README.rst",
    "README.txt",
    "LICENSE",
    "LICENSE.md",
    "LICENSE.txt",
    "CHANGELOG",
    "CHANGELOG.md",
    "CONTRIBUTING.md",
    "CODE_OF_CONDUCT.md",
    "NOTICE",
    "AUTHORS",
];

/// Exact filenames classified as configuration. These take precedence
/// over extension rules, and the ConfigFileParser keys off them.
const CONFIG_FILENAMES: &[&str] = &[
    "package.json",
    "package-lock.json",
    "requirements.txt",
    "requirements-dev.txt",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "Cargo.toml",
    "Cargo.lock",
    "go.mod",
    "go.sum",
    "composer.json",
    "Gemfile",
    "Gemfile.lock",
    "pom.xml",
    "tsconfig.json",
    "docker-compose.yml",
    "docker-compose.yaml",
    ".gitignore",
    ".dockerignore",
    ".editorconfig",
    ".env.example",
];

/// Exact filenames classified as build tooling.
const BUILD_FILENAMES: &[&str] = &[
    "Makefile",
    "makefile",
    "GNUmakefile",
    "Dockerfile",
    "CMakeLists.txt",
    "meson.build",
    "build.gradle",
    "build.gradle.kts",
    "settings.gradle",
    "settings.gradle.kts",
    "gradlew",
    "BUILD",
    "BUILD.bazel",
    "WORKSPACE",
    "justfile",
];

/// Source extensions and the language they imply.
const SOURCE_EXTENSIONS: &[(&str, &str)] = &[
    ("py", "Python"),
    ("pyi", "Python"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("mjs", "JavaScript"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("rs", "Rust"),
    ("go", "Go"),
    ("java", "Java"),
    ("kt", "Kotlin"),
    ("kts", "Kotlin"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("c", "C"),
    ("h", "C"),
    ("cpp", "C++"),
    ("cc", "C++"),
    ("hpp", "C++"),
    ("cs", "C#"),
    ("swift", "Swift"),
    ("ex", "Elixir"),
    ("exs", "Elixir"),
    ("sh", "Shell"),
];

const DOC_EXTENSIONS: &[&str] = &["md", "rst", "txt", "adoc"];

const CONFIG_EXTENSIONS: &[&str] = &[
    "json",
    "yaml",
    "yml",
    "toml",
    "ini",
    "cfg",
    "conf",
    "properties",
    "env",
];

/// Path components that mark a file as test code.
const TEST_DIR_COMPONENTS: &[&str] = &["tests", "test", "spec", "__tests__"];

pub struct FileCataloger;

impl FileCataloger {
    /// Classifies every raw record into a [`FileInfo`], keyed by path.
    pub fn catalog(records: &[RawFileRecord]) -> BTreeMap<String, FileInfo> {
        records
            .iter()
            .map(|record| (record.path.clone(), Self::classify(record)))
            .collect()
    }

    fn classify(record: &RawFileRecord) -> FileInfo {
        let extension = extension_of(&record.name);
        let file_type = file_type_for(&record.path, &record.name, &extension);
        let language = language_for(&extension);

        let framework_markers = match &record.content {
            Some(content) => frameworks::scan_markers(&record.name, content)
                .into_iter()
                .collect(),
            None => Default::default(),
        };

        FileInfo {
            name: record.name.clone(),
            path: record.path.clone(),
            extension,
            size: record.size,
            file_type,
            language,
            framework_markers,
            imports: Vec::new(),
        }
    }
}

fn extension_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => String::new(),
    }
}

fn file_type_for(path: &str, name: &str, extension: &str) -> FileType {
    // Exact filename rules win over everything else.
    if DOC_FILENAMES.contains(&name) {
        return FileType::Doc;
    }
    if CONFIG_FILENAMES.contains(&name) {
        return FileType::Config;
    }
    if BUILD_FILENAMES.contains(&name) {
        return FileType::Build;
    }

    if is_source_extension(extension) {
        if has_test_marker(path, name) {
            return FileType::Test;
        }
        return FileType::Source;
    }

    if DOC_EXTENSIONS.contains(&extension) {
        return FileType::Doc;
    }
    if CONFIG_EXTENSIONS.contains(&extension) {
        return FileType::Config;
    }

    FileType::Unknown
}

fn is_source_extension(extension: &str) -> bool {
    SOURCE_EXTENSIONS.iter().any(|(ext, _)| *ext == extension)
}

fn language_for(extension: &str) -> Option<String> {
    SOURCE_EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, lang)| lang.to_string())
}

fn has_test_marker(path: &str, name: &str) -> bool {
    if path
        .split('/')
        .rev()
        .skip(1)
        .any(|component| TEST_DIR_COMPONENTS.contains(&component))
    {
        return true;
    }

    let stem = name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name);
    name.starts_with("test_")
        || stem.ends_with("_test")
        || name.contains(".test.")
        || name.contains(".spec.")
}

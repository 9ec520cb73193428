//! Gitignore-aware filesystem traversal of a staged repository tree.
//!
//! The scan is read-only: it walks up to `config.max_depth`, applies
//! `.gitignore` rules when `config.respect_gitignore` is set (standard
//! semantics, including nested files and `!` negation, via the `ignore`
//! crate), never follows symlinks out of the root, and yields raw
//! records for cataloging. Files over `config.max_file_size` are still
//! recorded, just without content. Per-entry errors are logged and
//! skipped; only a completely unreadable root is fatal.

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use ignore::WalkBuilder;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

/// A file as seen on disk, before semantic classification.
#[derive(Debug, Clone)]
pub struct RawFileRecord {
    /// Repository-relative, `/`-separated path.
    pub path: String,
    pub name: String,
    pub size: u64,
    /// UTF-8 content, absent for oversized or binary files.
    pub content: Option<String>,
    /// True when content was withheld because of the size cap.
    pub truncated: bool,
}

/// A directory as seen on disk.
#[derive(Debug, Clone)]
pub struct RawDirRecord {
    pub path: String,
    pub name: String,
    pub depth: usize,
}

#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<RawFileRecord>,
    pub directories: Vec<RawDirRecord>,
}

pub struct FileSystemScanner;

impl FileSystemScanner {
    pub fn scan(root: &Path, config: &AnalyzerConfig) -> Result<ScanResult, AnalysisError> {
        if !root.is_dir() {
            return Err(AnalysisError::Validation(format!(
                "Scan root is not a directory: {}",
                root.display()
            )));
        }

        let start = Instant::now();
        let mut result = ScanResult::default();

        let walker = WalkBuilder::new(root)
            .max_depth(Some(config.max_depth))
            .hidden(false)
            .git_ignore(config.respect_gitignore)
            .git_exclude(config.respect_gitignore)
            .git_global(false)
            .require_git(false)
            .follow_links(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };

            if entry.path() == root {
                continue;
            }

            let Some(rel_path) = relative_path(root, entry.path()) else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().to_string();

            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                result.directories.push(RawDirRecord {
                    path: rel_path,
                    name,
                    depth: entry.depth(),
                });
                continue;
            }

            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(m) => m.len(),
                Err(err) => {
                    warn!(path = %entry.path().display(), error = %err, "Failed to stat file");
                    continue;
                }
            };

            let (content, truncated) = if size > config.max_file_size {
                (None, true)
            } else {
                match std::fs::read(entry.path()) {
                    Ok(bytes) => (String::from_utf8(bytes).ok(), false),
                    Err(err) => {
                        warn!(path = %entry.path().display(), error = %err, "Failed to read file");
                        (None, false)
                    }
                }
            };

            result.files.push(RawFileRecord {
                path: rel_path,
                name,
                size,
                content,
                truncated,
            });
        }

        // Walk order is filesystem-dependent; sort for determinism.
        result.files.sort_by(|a, b| a.path.cmp(&b.path));
        result.directories.sort_by(|a, b| a.path.cmp(&b.path));

        debug!(
            files = result.files.len(),
            directories = result.directories.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scan complete"
        );

        Ok(result)
    }
}

/// Repo-relative `/`-separated path, `None` for paths outside the root.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::create_dir(base.join("src")).unwrap();
        fs::write(base.join("src/main.py"), "print('hi')\n").unwrap();
        fs::write(base.join("src/utils.py"), "def util(): pass\n").unwrap();
        fs::create_dir(base.join("tests")).unwrap();
        fs::write(base.join("tests/test_utils.py"), "def test_util(): pass\n").unwrap();
        fs::write(base.join("README.md"), "# Test\n").unwrap();
        fs::write(base.join("requirements.txt"), "flask==2.0\n").unwrap();

        dir
    }

    fn paths(result: &ScanResult) -> Vec<&str> {
        result.files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_scan_finds_files_and_directories() {
        let repo = create_test_repo();
        let result = FileSystemScanner::scan(repo.path(), &AnalyzerConfig::default()).unwrap();

        let found = paths(&result);
        assert!(found.contains(&"src/main.py"));
        assert!(found.contains(&"tests/test_utils.py"));
        assert!(found.contains(&"README.md"));

        let dirs: Vec<&str> = result.directories.iter().map(|d| d.path.as_str()).collect();
        assert!(dirs.contains(&"src"));
        assert!(dirs.contains(&"tests"));
    }

    #[test]
    fn test_scan_reads_content() {
        let repo = create_test_repo();
        let result = FileSystemScanner::scan(repo.path(), &AnalyzerConfig::default()).unwrap();

        let main = result.files.iter().find(|f| f.path == "src/main.py").unwrap();
        assert_eq!(main.content.as_deref(), Some("print('hi')\n"));
        assert!(!main.truncated);
    }

    #[test]
    fn test_scan_nonexistent_root_fails() {
        let result =
            FileSystemScanner::scan(Path::new("/nonexistent"), &AnalyzerConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_respects_max_depth() {
        let repo = TempDir::new().unwrap();
        fs::create_dir_all(repo.path().join("a/b/c")).unwrap();
        fs::write(repo.path().join("a/b/c/deep.py"), "x = 1\n").unwrap();
        fs::write(repo.path().join("shallow.py"), "y = 2\n").unwrap();

        let config = AnalyzerConfig {
            max_depth: 2,
            ..Default::default()
        };
        let result = FileSystemScanner::scan(repo.path(), &config).unwrap();

        let found = paths(&result);
        assert!(found.contains(&"shallow.py"));
        assert!(!found.contains(&"a/b/c/deep.py"));
    }

    #[test]
    fn test_scan_oversized_file_recorded_without_content() {
        let repo = TempDir::new().unwrap();
        fs::write(repo.path().join("big.py"), "x".repeat(4096)).unwrap();

        let config = AnalyzerConfig {
            max_file_size: 1024,
            ..Default::default()
        };
        let result = FileSystemScanner::scan(repo.path(), &config).unwrap();

        let big = result.files.iter().find(|f| f.path == "big.py").unwrap();
        assert!(big.content.is_none());
        assert!(big.truncated);
        assert_eq!(big.size, 4096);
    }

    #[test]
    fn test_scan_binary_file_recorded_without_content() {
        let repo = TempDir::new().unwrap();
        fs::write(repo.path().join("blob.bin"), [0u8, 159, 146, 150]).unwrap();

        let result = FileSystemScanner::scan(repo.path(), &AnalyzerConfig::default()).unwrap();

        let blob = result.files.iter().find(|f| f.path == "blob.bin").unwrap();
        assert!(blob.content.is_none());
        assert!(!blob.truncated);
    }

    #[test]
    fn test_scan_respects_gitignore() {
        let repo = create_test_repo();
        fs::write(repo.path().join(".gitignore"), "generated/\n*.tmp\n").unwrap();
        fs::create_dir(repo.path().join("generated")).unwrap();
        fs::write(repo.path().join("generated/out.py"), "x = 1\n").unwrap();
        fs::write(repo.path().join("scratch.tmp"), "junk\n").unwrap();

        let result = FileSystemScanner::scan(repo.path(), &AnalyzerConfig::default()).unwrap();

        let found = paths(&result);
        assert!(!found.contains(&"generated/out.py"));
        assert!(!found.contains(&"scratch.tmp"));
        assert!(found.contains(&"src/main.py"));
    }

    #[test]
    fn test_scan_gitignore_negation() {
        let repo = TempDir::new().unwrap();
        fs::write(repo.path().join(".gitignore"), "*.log\n!keep.log\n").unwrap();
        fs::write(repo.path().join("drop.log"), "a\n").unwrap();
        fs::write(repo.path().join("keep.log"), "b\n").unwrap();

        let result = FileSystemScanner::scan(repo.path(), &AnalyzerConfig::default()).unwrap();

        let found = paths(&result);
        assert!(!found.contains(&"drop.log"));
        assert!(found.contains(&"keep.log"));
    }

    #[test]
    fn test_scan_gitignore_disabled() {
        let repo = TempDir::new().unwrap();
        fs::write(repo.path().join(".gitignore"), "*.log\n").unwrap();
        fs::write(repo.path().join("drop.log"), "a\n").unwrap();

        let config = AnalyzerConfig {
            respect_gitignore: false,
            ..Default::default()
        };
        let result = FileSystemScanner::scan(repo.path(), &config).unwrap();

        assert!(paths(&result).contains(&"drop.log"));
    }

    #[test]
    fn test_scan_skips_git_dir() {
        let repo = create_test_repo();
        fs::create_dir(repo.path().join(".git")).unwrap();
        fs::write(repo.path().join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();

        let result = FileSystemScanner::scan(repo.path(), &AnalyzerConfig::default()).unwrap();

        assert!(!paths(&result).iter().any(|p| p.starts_with(".git")));
    }

    #[test]
    fn test_scan_output_is_sorted() {
        let repo = create_test_repo();
        let result = FileSystemScanner::scan(repo.path(), &AnalyzerConfig::default()).unwrap();

        let mut sorted = paths(&result);
        sorted.sort();
        assert_eq!(paths(&result), sorted);
    }
}

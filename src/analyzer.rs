//! The orchestrator: sequences classification, staging, scanning,
//! cataloging, detection, and metric synthesis into one immutable
//! [`RepositoryStructure`], and owns the temporary directories created
//! along the way.
//!
//! Every temporary path is tracked on the analyzer and released through
//! [`RepositoryAnalyzer::cleanup`], which is idempotent and re-invoked
//! automatically before any fatal error propagates. User-supplied local
//! paths are never deleted.

use crate::catalog::{DirectoryCataloger, FileCataloger};
use crate::config::AnalyzerConfig;
use crate::configfiles::{ConfigFileParser, ConfigMetadata};
use crate::detect::{FrameworkDetector, PatternDetector};
use crate::error::AnalysisError;
use crate::imports::{ImportAnalyzer, RelationshipMapper};
use crate::input::{InputClassifier, ProcessedInput, RepositoryStager};
use crate::model::{
    DirectoryInfo, FileInfo, FileType, RepositoryMetadata, RepositoryStructure,
};
use crate::scan::FileSystemScanner;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Root-level configs consulted for the repository name/description,
/// in order of preference.
const NAMING_CONFIGS: &[&str] = &["package.json", "Cargo.toml", "pyproject.toml", "pom.xml"];

pub struct RepositoryAnalyzer {
    config: AnalyzerConfig,
    stager: RepositoryStager,
    temp_paths: Vec<PathBuf>,
}

impl Default for RepositoryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryAnalyzer {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        let stager = RepositoryStager::new(&config);
        Self {
            config,
            stager,
            temp_paths: Vec::new(),
        }
    }

    /// Analyzes a repository reference end to end.
    ///
    /// Fails with [`AnalysisError::RepositoryNotFound`] for missing
    /// local paths, [`AnalysisError::Authentication`] /
    /// [`AnalysisError::Git`] for staging failures, and
    /// [`AnalysisError::Validation`] for unrecognizable input. On any
    /// failure the partially built state is discarded and temporary
    /// directories are cleaned up before the error propagates.
    pub async fn analyze(&mut self, source: &str) -> Result<RepositoryStructure, AnalysisError> {
        let start = Instant::now();

        let classification = InputClassifier::classify(source);
        debug!(
            source,
            input_type = ?classification.input_type,
            provider = %classification.provider,
            confidence = classification.confidence,
            "Classified input"
        );

        let input = self.stager.stage(&classification, source).await?;
        if input.is_temporary {
            self.temp_paths.push(input.local_path.clone());
        }

        match self.run_pipeline(&input).await {
            Ok(structure) => {
                info!(
                    source,
                    files = structure.files.len(),
                    directories = structure.directories.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Analysis complete"
                );
                Ok(structure)
            }
            Err(err) => {
                warn!(source, error = %err, "Analysis failed, cleaning up");
                self.cleanup();
                Err(err)
            }
        }
    }

    async fn run_pipeline(
        &self,
        input: &ProcessedInput,
    ) -> Result<RepositoryStructure, AnalysisError> {
        let scan = FileSystemScanner::scan(&input.local_path, &self.config)?;

        let mut files = FileCataloger::catalog(&scan.files);
        let directories = DirectoryCataloger::catalog(&scan.directories, &files);

        // Config parsing feeds framework versions, so it runs before the
        // detector pair; the two detectors themselves are independent
        // reads over the merged catalog.
        let configs = ConfigFileParser::parse(&scan.files, &files);
        let ((project_type, patterns), frameworks) = tokio::join!(
            async {
                let project_type = PatternDetector::detect_project_type(&directories, &files);
                let patterns = PatternDetector::detect_patterns(&directories, &files);
                (project_type, patterns)
            },
            async {
                if self.config.detect_frameworks {
                    FrameworkDetector::detect(&files, &configs)
                } else {
                    Vec::new()
                }
            }
        );

        let (imports, relationships) = {
            let imports = if self.config.analyze_imports {
                ImportAnalyzer::analyze(&scan.files, &files)
            } else {
                BTreeMap::new()
            };
            let relationships = if self.config.map_relationships {
                RelationshipMapper::map(&files, &imports)
            } else {
                Vec::new()
            };
            (imports, relationships)
        };

        for (path, targets) in &imports {
            if let Some(info) = files.get_mut(path) {
                info.imports = targets.clone();
            }
        }

        let metadata = synthesize_metadata(
            &input.local_path,
            &files,
            &directories,
            &patterns,
            &frameworks,
            &configs,
            project_type,
        );

        Ok(RepositoryStructure {
            source: input.source.clone(),
            root_path: input.local_path.clone(),
            project_type,
            frameworks,
            directories,
            files,
            patterns,
            relationships,
            metadata,
        })
    }

    /// Removes every temporary staging directory this analyzer created.
    /// Safe to call repeatedly; later calls are no-ops.
    pub fn cleanup(&mut self) {
        for path in std::mem::take(&mut self.temp_paths) {
            self.stager.cleanup_temp(&path);
        }
    }

    /// Temporary directories currently pending cleanup.
    pub fn pending_temp_paths(&self) -> &[PathBuf] {
        &self.temp_paths
    }
}

fn synthesize_metadata(
    root_path: &std::path::Path,
    files: &BTreeMap<String, FileInfo>,
    directories: &BTreeMap<String, DirectoryInfo>,
    patterns: &[crate::model::Pattern],
    frameworks: &[crate::model::Framework],
    configs: &[ConfigMetadata],
    project_type: crate::model::ProjectType,
) -> RepositoryMetadata {
    let (name, description) = name_and_description(root_path, configs);

    let languages: BTreeSet<String> = files
        .values()
        .filter_map(|f| f.language.clone())
        .collect();
    let primary_language = primary_language(files);

    RepositoryMetadata {
        name,
        description,
        primary_language,
        languages,
        frameworks: frameworks.iter().map(|f| f.name.clone()).collect(),
        architecture_type: project_type.as_str().to_string(),
        complexity_score: complexity_score(files, directories, patterns, frameworks),
        documentation_coverage: documentation_coverage(files, directories),
        test_coverage_estimate: test_coverage_estimate(files),
        entry_points: entry_points(files),
        configuration_files: files
            .iter()
            .filter(|(_, f)| f.file_type == FileType::Config)
            .map(|(path, _)| path.clone())
            .collect(),
    }
}

fn name_and_description(
    root_path: &std::path::Path,
    configs: &[ConfigMetadata],
) -> (String, String) {
    let mut name = None;
    let mut description = None;

    for preferred in NAMING_CONFIGS {
        let Some(config) = configs
            .iter()
            .find(|c| !c.path.contains('/') && c.path == *preferred)
        else {
            continue;
        };
        if name.is_none() {
            name = config.name.clone();
        }
        if description.is_none() {
            description = config.description.clone();
        }
    }

    let name = name.unwrap_or_else(|| {
        root_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "repository".to_string())
    });

    (name, description.unwrap_or_default())
}

/// Most common language among source files, `Unknown` when there are
/// none. Ties break alphabetically for determinism.
fn primary_language(files: &BTreeMap<String, FileInfo>) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for info in files.values() {
        if info.file_type == FileType::Source {
            if let Some(language) = info.language.as_deref() {
                *counts.entry(language).or_insert(0) += 1;
            }
        }
    }

    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(language, _)| language.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Bounded combination of repository size, nesting depth, and detection
/// richness. Always in [0, 1].
fn complexity_score(
    files: &BTreeMap<String, FileInfo>,
    directories: &BTreeMap<String, DirectoryInfo>,
    patterns: &[crate::model::Pattern],
    frameworks: &[crate::model::Framework],
) -> f64 {
    let file_factor = (files.len() as f64 / 400.0).min(1.0);

    let max_depth = directories
        .keys()
        .map(|p| p.split('/').count())
        .max()
        .unwrap_or(0);
    let depth_factor = (max_depth as f64 / 8.0).min(1.0);

    let detection_factor = ((patterns.len() + frameworks.len()) as f64 / 8.0).min(1.0);

    0.4 * file_factor + 0.3 * depth_factor + 0.3 * detection_factor
}

/// Fraction of directories holding at least one DOC file directly.
/// Zero directories yields 0.0, never an error.
fn documentation_coverage(
    files: &BTreeMap<String, FileInfo>,
    directories: &BTreeMap<String, DirectoryInfo>,
) -> f64 {
    if directories.is_empty() {
        return 0.0;
    }

    let documented = directories
        .keys()
        .filter(|dir| {
            let prefix = format!("{}/", dir);
            files.iter().any(|(path, info)| {
                info.file_type == FileType::Doc
                    && path
                        .strip_prefix(&prefix)
                        .map(|rest| !rest.contains('/'))
                        .unwrap_or(false)
            })
        })
        .count();

    documented as f64 / directories.len() as f64
}

/// TEST files over SOURCE files, clamped to [0, 1]. Zero source files
/// yields 0.0.
fn test_coverage_estimate(files: &BTreeMap<String, FileInfo>) -> f64 {
    let source = files
        .values()
        .filter(|f| f.file_type == FileType::Source)
        .count();
    if source == 0 {
        return 0.0;
    }
    let test = files
        .values()
        .filter(|f| f.file_type == FileType::Test)
        .count();

    (test as f64 / source as f64).min(1.0)
}

/// Conventional entry-point names at the root or directly under `src/`.
fn entry_points(files: &BTreeMap<String, FileInfo>) -> Vec<String> {
    files
        .iter()
        .filter(|(path, info)| {
            let stem = info
                .name
                .rsplit_once('.')
                .map(|(s, _)| s)
                .unwrap_or(&info.name);
            let conventional = matches!(stem, "main" | "__main__" | "index");
            let scoped = !path.contains('/')
                || path.as_str() == format!("src/{}", info.name).as_str();
            conventional && scoped
        })
        .map(|(path, _)| path.clone())
        .collect()
}

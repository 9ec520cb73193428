//! Configuration for the analysis pipeline.
//!
//! [`AnalyzerConfig`] carries the recognized options from the external
//! interface: traversal bounds (`max_depth`, `max_file_size`), gitignore
//! handling, the per-stage switches (`analyze_imports`,
//! `detect_frameworks`, `map_relationships`), and the temp root used for
//! staged clones. `Default` gives library defaults; [`AnalyzerConfig::from_env`]
//! overlays `REPOLENS_*` environment variables on top of them.
//!
//! # Environment Variables
//!
//! - `REPOLENS_MAX_DEPTH`: maximum traversal depth - default: "10"
//! - `REPOLENS_RESPECT_GITIGNORE`: apply .gitignore rules (true|false) - default: "true"
//! - `REPOLENS_ANALYZE_IMPORTS`: extract imports (true|false) - default: "true"
//! - `REPOLENS_DETECT_FRAMEWORKS`: detect frameworks (true|false) - default: "true"
//! - `REPOLENS_MAP_RELATIONSHIPS`: build the relationship graph (true|false) - default: "true"
//! - `REPOLENS_MAX_FILE_SIZE`: per-file content read cap in bytes - default: "262144" (256KB)
//! - `REPOLENS_TEMP_DIR`: temp root for staged clones - default: system temp dir + "repolens"
//! - `REPOLENS_CLONE_TIMEOUT`: clone timeout in seconds - default: "120"
//! - `REPOLENS_CLONE_DEPTH`: shallow clone depth, "0" for full history - default: "1"

use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_MAX_DEPTH: usize = 10;
const DEFAULT_MAX_FILE_SIZE: u64 = 256 * 1024;
const DEFAULT_CLONE_TIMEOUT_SECS: u64 = 120;
const DEFAULT_CLONE_DEPTH: u32 = 1;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Maximum directory depth the scanner descends to.
    pub max_depth: usize,

    /// Apply `.gitignore` rules during the scan.
    pub respect_gitignore: bool,

    /// Extract best-effort import targets from source files.
    pub analyze_imports: bool,

    /// Run framework detection over the catalog.
    pub detect_frameworks: bool,

    /// Build the file relationship graph from resolved imports.
    pub map_relationships: bool,

    /// Files larger than this are cataloged without content.
    pub max_file_size: u64,

    /// Root directory for staged clones; `cleanup_temp` refuses to
    /// delete anything outside it.
    pub temp_dir: PathBuf,

    /// Hard deadline for a remote clone, in seconds.
    pub clone_timeout_secs: u64,

    /// Shallow clone depth; `None` clones full history.
    pub clone_depth: Option<u32>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            respect_gitignore: true,
            analyze_imports: true,
            detect_frameworks: true,
            map_relationships: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            temp_dir: env::temp_dir().join("repolens"),
            clone_timeout_secs: DEFAULT_CLONE_TIMEOUT_SECS,
            clone_depth: Some(DEFAULT_CLONE_DEPTH),
        }
    }
}

impl AnalyzerConfig {
    /// Loads configuration from `REPOLENS_*` environment variables,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_depth = env::var("REPOLENS_MAX_DEPTH")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.max_depth);

        let respect_gitignore = env::var("REPOLENS_RESPECT_GITIGNORE")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults.respect_gitignore);

        let analyze_imports = env::var("REPOLENS_ANALYZE_IMPORTS")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults.analyze_imports);

        let detect_frameworks = env::var("REPOLENS_DETECT_FRAMEWORKS")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults.detect_frameworks);

        let map_relationships = env::var("REPOLENS_MAP_RELATIONSHIPS")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults.map_relationships);

        let max_file_size = env::var("REPOLENS_MAX_FILE_SIZE")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.max_file_size);

        let temp_dir = env::var("REPOLENS_TEMP_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or(defaults.temp_dir);

        let clone_timeout_secs = env::var("REPOLENS_CLONE_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.clone_timeout_secs);

        let clone_depth = env::var("REPOLENS_CLONE_DEPTH")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .map(|d| if d == 0 { None } else { Some(d) })
            .unwrap_or(defaults.clone_depth);

        Self {
            max_depth,
            respect_gitignore,
            analyze_imports,
            detect_frameworks,
            map_relationships,
            max_file_size,
            temp_dir,
            clone_timeout_secs,
            clone_depth,
        }
    }

    /// Checks that numeric bounds are usable before a run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max depth must be at least 1".to_string(),
            ));
        }

        if self.max_file_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max file size must be at least 1 byte".to_string(),
            ));
        }

        if self.clone_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Clone timeout must be at least 1 second".to_string(),
            ));
        }
        if self.clone_timeout_secs > 3600 {
            return Err(ConfigError::ValidationFailed(
                "Clone timeout cannot exceed 1 hour".to_string(),
            ));
        }

        Ok(())
    }
}

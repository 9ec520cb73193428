//! repolens - repository structure analysis engine
//!
//! This library ingests a reference to a software repository - a local
//! path or a remote Git URL - and produces a structured, queryable
//! model of it: directories, files, detected architectural patterns,
//! frameworks, inter-file relationships, and summary metrics. It is the
//! analytical engine behind downstream tooling (README generators,
//! workflow adapters) that consumes the resulting
//! [`RepositoryStructure`].
//!
//! # Core Concepts
//!
//! - **Staging**: producing a local, analyzable copy of a repository
//!   from a URL or path, with guaranteed cleanup of anything temporary
//! - **Catalog**: the mapping of every discovered file and directory to
//!   a semantic type and attributes
//! - **Detection**: data-driven scoring of the catalog against pattern
//!   and framework signature tables
//!
//! # Example Usage
//!
//! ```no_run
//! use repolens::{AnalyzerConfig, RepositoryAnalyzer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut analyzer = RepositoryAnalyzer::with_config(AnalyzerConfig::default());
//!
//! let structure = analyzer.analyze("https://github.com/user/repo.git").await?;
//! println!("{}", structure);
//! println!("Primary language: {}", structure.metadata.primary_language);
//!
//! // Release any staged clone directories.
//! analyzer.cleanup();
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`input`]: input classification and repository staging
//! - [`scan`]: gitignore-aware filesystem traversal
//! - [`catalog`]: semantic file/directory cataloging
//! - [`detect`]: pattern and framework detection
//! - [`imports`]: best-effort import extraction and relationship mapping
//! - [`configfiles`]: tolerant configuration-file parsing
//! - [`analyzer`]: the orchestrator and metric synthesis

pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod configfiles;
pub mod detect;
pub mod error;
pub mod imports;
pub mod input;
pub mod model;
pub mod scan;
pub mod util;

// Re-export key types for convenient access
pub use analyzer::RepositoryAnalyzer;
pub use config::{AnalyzerConfig, ConfigError};
pub use configfiles::{ConfigFileParser, ConfigMetadata, DependencyEntry};
pub use detect::{FrameworkDetector, PatternDetector};
pub use error::AnalysisError;
pub use imports::{ImportAnalyzer, RelationshipMapper};
pub use input::{ClassificationResult, InputClassifier, InputType, ProcessedInput, RepositoryStager};
pub use model::{
    DirectoryInfo, DirectoryType, FileInfo, FileType, Framework, Pattern, ProjectType,
    Relationship, RepositoryMetadata, RepositoryStructure,
};
pub use scan::FileSystemScanner;
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

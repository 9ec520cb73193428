//! Error taxonomy for the analysis pipeline.
//!
//! Only staging-level and classification-level failures are fatal to an
//! `analyze` call; per-file errors during scanning or parsing are
//! recovered locally and logged. On any fatal failure the analyzer
//! still attempts cleanup of temporary directories, and partially built
//! results are discarded.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A local path or remote repository does not exist.
    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    /// Remote access was denied. Distinguished from not-found by
    /// inspecting the git client's error output.
    #[error("Authentication failed for {url}: {reason}")]
    Authentication { url: String, reason: String },

    /// Any other staging failure, including clone timeouts.
    #[error("Git operation failed: {0}")]
    Git(String),

    /// Input failed basic safety checks before staging.
    #[error("Invalid repository source: {0}")]
    Validation(String),

    /// Unexpected internal failure; wraps the underlying cause.
    #[error("Analysis failed: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AnalysisError {
    /// True when the message points at a missing remote rather than a
    /// local path.
    pub fn is_not_found(&self) -> bool {
        match self {
            AnalysisError::RepositoryNotFound(_) => true,
            AnalysisError::Git(msg) => msg.to_lowercase().contains("not found"),
            _ => false,
        }
    }
}

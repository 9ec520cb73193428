//! Input handling: classification of repository references and staging
//! of a local, analyzable tree.

pub mod classifier;
pub mod stager;

pub use classifier::InputClassifier;
pub use stager::RepositoryStager;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of repository reference the caller handed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    LocalPath,
    GithubUrl,
    GitlabUrl,
    BitbucketUrl,
    GenericGitUrl,
    Unknown,
}

impl InputType {
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            InputType::GithubUrl
                | InputType::GitlabUrl
                | InputType::BitbucketUrl
                | InputType::GenericGitUrl
        )
    }
}

/// Verdict of [`InputClassifier::classify`]: one per `analyze` call,
/// immutable, never persisted beyond it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub input_type: InputType,
    /// `"github"`, `"gitlab"`, `"bitbucket"`, `"generic"`, or empty.
    pub provider: String,
    /// Heuristic strength of the classification, 0.0-1.0.
    pub confidence: f64,
}

/// A staged, readable repository tree ready for scanning.
///
/// `is_temporary` is the sole authority for cleanup decisions: only
/// paths the stager itself created are ever deleted.
#[derive(Debug, Clone)]
pub struct ProcessedInput {
    pub source: String,
    pub local_path: PathBuf,
    pub is_temporary: bool,
    pub auth_used: bool,
}

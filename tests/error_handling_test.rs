//! Error handling and cleanup guarantees
//!
//! Staging failures must map to the right taxonomy variant, cleanup
//! must refuse to touch anything outside the temp root, and
//! user-supplied local paths must never be deleted.

use repolens::{
    AnalysisError, AnalyzerConfig, InputClassifier, InputType, RepositoryAnalyzer,
    RepositoryStager,
};
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_missing_local_path_is_not_found() {
    let mut analyzer = RepositoryAnalyzer::new();
    let result = analyzer.analyze("/definitely/not/a/repository").await;

    match result {
        Err(AnalysisError::RepositoryNotFound(path)) => {
            assert!(path.contains("/definitely/not/a/repository"));
        }
        other => panic!("expected RepositoryNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_input_is_validation_error() {
    let mut analyzer = RepositoryAnalyzer::new();
    let result = analyzer.analyze("").await;
    assert!(matches!(result, Err(AnalysisError::Validation(_))));
}

#[tokio::test]
async fn test_plain_file_is_validation_error() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("file.txt");
    fs::write(&file, "content").unwrap();

    let mut analyzer = RepositoryAnalyzer::new();
    let raw = file.to_string_lossy().to_string();
    let result = analyzer.analyze(&raw).await;

    assert!(matches!(result, Err(AnalysisError::Validation(_))));
}

#[tokio::test]
async fn test_error_leaves_no_pending_temp_paths() {
    let mut analyzer = RepositoryAnalyzer::new();
    let _ = analyzer.analyze("/missing/one").await;
    let _ = analyzer.analyze("").await;
    assert!(analyzer.pending_temp_paths().is_empty());
}

#[test]
fn test_cleanup_temp_refuses_foreign_paths() {
    let temp_root = TempDir::new().unwrap();
    let victim = TempDir::new().unwrap();
    fs::write(victim.path().join("precious.txt"), "keep me").unwrap();

    let config = AnalyzerConfig {
        temp_dir: temp_root.path().to_path_buf(),
        ..Default::default()
    };
    let stager = RepositoryStager::new(&config);

    assert!(!stager.cleanup_temp(victim.path()));
    assert!(victim.path().join("precious.txt").exists());
}

#[test]
fn test_cleanup_temp_missing_path() {
    let temp_root = TempDir::new().unwrap();
    let config = AnalyzerConfig {
        temp_dir: temp_root.path().to_path_buf(),
        ..Default::default()
    };
    let stager = RepositoryStager::new(&config);

    assert!(!stager.cleanup_temp(&temp_root.path().join("clone-never-existed")));
}

#[tokio::test]
async fn test_user_path_survives_cleanup() {
    let repo = TempDir::new().unwrap();
    fs::write(repo.path().join("main.py"), "print('hi')\n").unwrap();

    let mut analyzer = RepositoryAnalyzer::new();
    let raw = repo.path().to_string_lossy().to_string();
    analyzer.analyze(&raw).await.unwrap();

    analyzer.cleanup();
    analyzer.cleanup();

    assert!(repo.path().join("main.py").exists());
}

#[test]
fn test_classifier_never_panics() {
    for input in [
        "",
        " ",
        "://",
        "git@",
        "git@:",
        "@:",
        "https://",
        "a@b:c",
        "C:\\windows\\style",
        "🦀",
        "git@github.com:",
        "..",
        "....git",
    ] {
        let result = InputClassifier::classify(input);
        assert!((0.0..=1.0).contains(&result.confidence), "input: {:?}", input);
    }
}

#[test]
fn test_scp_shapes_are_git_urls() {
    // Property: SCP-shaped strings never classify as local paths.
    for input in [
        "git@github.com:user/repo.git",
        "git@gitlab.com:group/project.git",
        "deploy@git.internal:apps/api.git",
    ] {
        let result = InputClassifier::classify(input);
        assert_ne!(result.input_type, InputType::LocalPath, "input: {}", input);
        assert!(result.confidence >= 0.7);
    }
}

#[tokio::test]
async fn test_existing_directory_classifies_and_stages_in_place() {
    let repo = TempDir::new().unwrap();
    let raw = repo.path().to_string_lossy().to_string();

    let classification = InputClassifier::classify(&raw);
    assert_eq!(classification.input_type, InputType::LocalPath);
    assert_eq!(classification.confidence, 1.0);

    let config = AnalyzerConfig::default();
    let stager = RepositoryStager::new(&config);
    let input = stager.stage(&classification, &raw).await.unwrap();
    assert!(!input.is_temporary);
}

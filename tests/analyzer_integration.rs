//! Integration tests for the repository analyzer
//!
//! These tests verify the complete pipeline over realistic repository
//! layouts: cataloging, detection, relationship mapping, and metric
//! synthesis.

use repolens::{AnalyzerConfig, FileType, ProjectType, RepositoryAnalyzer, RepositoryStructure};
use std::fs;
use tempfile::TempDir;

/// Helper to create the canonical Python sample repository.
fn create_python_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path();

    fs::create_dir(repo_path.join("src")).unwrap();
    fs::write(
        repo_path.join("src/main.py"),
        "import utils\n\n\ndef run():\n    utils.helper()\n",
    )
    .unwrap();
    fs::write(
        repo_path.join("src/utils.py"),
        "def helper():\n    return 42\n",
    )
    .unwrap();

    fs::create_dir(repo_path.join("tests")).unwrap();
    fs::write(
        repo_path.join("tests/test_utils.py"),
        "from utils import helper\n\n\ndef test_helper():\n    assert helper() == 42\n",
    )
    .unwrap();

    fs::write(repo_path.join("README.md"), "# Sample\n\nA sample project.\n").unwrap();
    fs::write(repo_path.join("requirements.txt"), "flask==2.3.0\n").unwrap();

    temp_dir
}

/// Helper to create a Node.js project fixture.
fn create_node_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path();

    fs::write(
        repo_path.join("package.json"),
        r#"{
  "name": "sample-app",
  "description": "Sample web application",
  "main": "src/index.js",
  "dependencies": {"express": "^4.18.2"}
}
"#,
    )
    .unwrap();

    fs::create_dir(repo_path.join("src")).unwrap();
    fs::write(
        repo_path.join("src/index.js"),
        "const express = require('express');\nconst routes = require('./routes');\n",
    )
    .unwrap();
    fs::write(
        repo_path.join("src/routes.js"),
        "module.exports = {};\n",
    )
    .unwrap();
    fs::write(repo_path.join("README.md"), "# Sample App\n").unwrap();

    temp_dir
}

async fn analyze(path: &std::path::Path) -> RepositoryStructure {
    let mut analyzer = RepositoryAnalyzer::new();
    let raw = path.to_string_lossy().to_string();
    analyzer.analyze(&raw).await.unwrap()
}

#[tokio::test]
async fn test_python_project_catalog() {
    let repo = create_python_project();
    let structure = analyze(repo.path()).await;

    assert!(structure.directories.contains_key("src"));
    assert!(structure.directories.contains_key("tests"));
    assert_eq!(
        structure.directories["src"].dir_type,
        repolens::DirectoryType::Source
    );
    assert_eq!(
        structure.directories["tests"].dir_type,
        repolens::DirectoryType::Tests
    );

    assert_eq!(structure.files["src/main.py"].file_type, FileType::Source);
    assert_eq!(
        structure.files["tests/test_utils.py"].file_type,
        FileType::Test
    );
    assert_eq!(structure.files["README.md"].file_type, FileType::Doc);
    assert_eq!(
        structure.files["requirements.txt"].file_type,
        FileType::Config
    );
}

#[tokio::test]
async fn test_python_project_metadata() {
    let repo = create_python_project();
    let structure = analyze(repo.path()).await;

    let metadata = &structure.metadata;
    assert_eq!(metadata.primary_language, "Python");
    assert!(metadata.languages.contains("Python"));
    assert!(metadata
        .configuration_files
        .contains(&"requirements.txt".to_string()));
    assert_eq!(metadata.entry_points, vec!["src/main.py"]);
    assert_eq!(metadata.architecture_type, "monolith");
}

#[tokio::test]
async fn test_python_project_is_monolith() {
    let repo = create_python_project();
    let structure = analyze(repo.path()).await;
    assert_eq!(structure.project_type, ProjectType::Monolith);
}

#[tokio::test]
async fn test_python_project_patterns() {
    let repo = create_python_project();
    let structure = analyze(repo.path()).await;

    let names: Vec<&str> = structure.patterns.iter().map(|p| p.name.as_str()).collect();
    assert!(names.contains(&"standard_python"));
    assert!(names.contains(&"configuration_files"));
    assert!(names.contains(&"test_files"));

    for pattern in &structure.patterns {
        assert!(pattern.confidence > 0.0 && pattern.confidence <= 1.0);
    }
}

#[tokio::test]
async fn test_python_project_flask_detected() {
    let repo = create_python_project();
    let structure = analyze(repo.path()).await;

    let flask = structure
        .frameworks
        .iter()
        .find(|f| f.name == "flask")
        .expect("flask detected from requirements.txt");
    assert!(flask.confidence >= 0.5);
    assert!(flask.files.contains("requirements.txt"));
    assert_eq!(flask.version.as_deref(), Some("2.3.0"));
}

#[tokio::test]
async fn test_node_project_end_to_end() {
    let repo = create_node_project();
    let structure = analyze(repo.path()).await;

    assert_eq!(structure.metadata.primary_language, "JavaScript");
    assert_eq!(structure.metadata.name, "sample-app");
    assert_eq!(structure.metadata.description, "Sample web application");
    assert!(structure.has_framework("express"));

    // require('./routes') resolves to a relationship edge.
    assert!(structure
        .relationships
        .iter()
        .any(|r| r.source == "src/index.js" && r.target == "src/routes.js" && r.strength == 1.0));
}

#[tokio::test]
async fn test_analysis_is_idempotent() {
    let repo = create_python_project();
    let first = analyze(repo.path()).await;
    let second = analyze(repo.path()).await;

    assert_eq!(first.files, second.files);
    assert_eq!(first.directories, second.directories);
    assert_eq!(first.patterns, second.patterns);
    assert_eq!(first.metadata, second.metadata);
}

#[tokio::test]
async fn test_metrics_in_bounds() {
    let repo = create_python_project();
    let structure = analyze(repo.path()).await;

    let metadata = &structure.metadata;
    assert!((0.0..=1.0).contains(&metadata.complexity_score));
    assert!((0.0..=1.0).contains(&metadata.documentation_coverage));
    assert!((0.0..=1.0).contains(&metadata.test_coverage_estimate));
    // One test file over two source files.
    assert!((metadata.test_coverage_estimate - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_empty_repository() {
    let repo = TempDir::new().unwrap();
    let structure = analyze(repo.path()).await;

    assert!(structure.files.is_empty());
    assert!(structure.directories.is_empty());
    assert_eq!(structure.project_type, ProjectType::Unknown);
    assert_eq!(structure.metadata.test_coverage_estimate, 0.0);
    assert_eq!(structure.metadata.documentation_coverage, 0.0);
    assert_eq!(structure.metadata.primary_language, "Unknown");
}

#[tokio::test]
async fn test_gitignored_files_excluded() {
    let repo = create_python_project();
    fs::write(repo.path().join(".gitignore"), "build/\n*.log\n").unwrap();
    fs::create_dir(repo.path().join("build")).unwrap();
    fs::write(repo.path().join("build/out.py"), "x = 1\n").unwrap();
    fs::write(repo.path().join("debug.log"), "noise\n").unwrap();

    let structure = analyze(repo.path()).await;

    assert!(!structure.files.contains_key("build/out.py"));
    assert!(!structure.files.contains_key("debug.log"));
    assert!(!structure.directories.contains_key("build"));
    assert!(structure.files.contains_key("src/main.py"));
}

#[tokio::test]
async fn test_structure_serializes() {
    let repo = create_python_project();
    let structure = analyze(repo.path()).await;

    let json = serde_json::to_string(&structure).unwrap();
    let back: RepositoryStructure = serde_json::from_str(&json).unwrap();
    assert_eq!(structure, back);
}

#[tokio::test]
async fn test_config_metadata_invariant() {
    // metadata.configuration_files is a subset of CONFIG-typed files.
    let repo = create_node_project();
    let structure = analyze(repo.path()).await;

    for path in &structure.metadata.configuration_files {
        let info = structure.files.get(path).expect("path cataloged");
        assert_eq!(info.file_type, FileType::Config);
    }
}

#[tokio::test]
async fn test_oversized_file_still_counted() {
    let repo = create_python_project();
    fs::write(repo.path().join("src/big.py"), "# x\n".repeat(5000)).unwrap();

    let config = AnalyzerConfig {
        max_file_size: 1024,
        ..Default::default()
    };
    let mut analyzer = RepositoryAnalyzer::with_config(config);
    let raw = repo.path().to_string_lossy().to_string();
    let structure = analyzer.analyze(&raw).await.unwrap();

    // Present in the catalog and in directory counts despite the cap.
    assert!(structure.files.contains_key("src/big.py"));
    assert_eq!(structure.directories["src"].file_count, 3);
}

use scaffold::config::ScaffoldConfig;
use scaffold::document::{LoadMode, YamlTranslator};
use scaffold::error::ApiError;
use scaffold::remote::DryRunHost;
use scaffold::store::MemoryDocumentStore;
use scaffold::{Pipeline, PublishOptions};
use std::sync::Arc;
use tempfile::TempDir;

use crate::integration::support::SAMPLE_DOC;

const MALFORMED_DOC: &str = r#"
project_name: messy
structure:
  - name: broken.txt
    type: file
    children:
      - name: nested.txt
        type: file
  - name: kept.txt
    type: file
    content: kept
"#;

fn pipeline(workspace: &TempDir, mode: LoadMode) -> Pipeline {
    let mut config = ScaffoldConfig::default();
    config.loader.mode = mode;
    Pipeline::new(Arc::new(MemoryDocumentStore::new()), config, workspace.path())
}

#[test]
fn ingest_then_build_then_rebuild() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(&temp_dir, LoadMode::Permissive);
    let fp = pipeline.ingest(SAMPLE_DOC, &YamlTranslator).unwrap();
    let root = temp_dir.path().join("proj");

    let first = pipeline.build_local(&fp, Some(root.clone())).unwrap();
    let second = pipeline.build_local(&fp, Some(root.clone())).unwrap();
    assert_eq!(first, second);
    assert_eq!(std::fs::read_to_string(root.join("src/main.txt")).unwrap(), "hi");
    assert_eq!(std::fs::read_to_string(root.join("README.md")).unwrap(), "hello");
}

#[test]
fn permissive_mode_skips_and_strict_mode_rejects() {
    let temp_dir = TempDir::new().unwrap();

    let permissive = pipeline(&temp_dir, LoadMode::Permissive);
    let fp = permissive.ingest(MALFORMED_DOC, &YamlTranslator).unwrap();
    let (_, loaded) = permissive.load(&fp).unwrap();
    assert_eq!(loaded.report.skipped.len(), 1);
    assert_eq!(loaded.tree.file_count(), 1);
    assert!(loaded.tree.resolve("kept.txt").is_ok());

    let strict = pipeline(&temp_dir, LoadMode::Strict);
    let fp = strict.ingest(MALFORMED_DOC, &YamlTranslator).unwrap();
    let err = strict.load(&fp).unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[test]
fn invalid_tree_never_touches_disk() {
    let raw = "structure:\n  - {name: a, type: file}\n  - {name: a, type: directory}\n";
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(&temp_dir, LoadMode::Permissive);
    let fp = pipeline.ingest(raw, &YamlTranslator).unwrap();

    let root = temp_dir.path().join("never");
    let err = pipeline.build_local(&fp, Some(root.clone())).unwrap_err();
    assert_eq!(err.kind(), "validation");
    assert!(!root.exists());
}

#[tokio::test]
async fn publish_with_explicit_options() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(&temp_dir, LoadMode::Permissive);
    let fp = pipeline.ingest(SAMPLE_DOC, &YamlTranslator).unwrap();
    let host = Arc::new(DryRunHost::new("octo"));

    let report = pipeline
        .publish(
            &fp,
            host.clone(),
            PublishOptions {
                name: Some("renamed".to_string()),
                base_path: "template".to_string(),
                ..PublishOptions::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(report.repository.full_name, "octo/renamed");
    let paths: Vec<_> = host.files().into_iter().map(|(p, _, _)| p).collect();
    assert_eq!(paths, vec!["template/src/main.txt", "template/README.md"]);
}

#[tokio::test]
async fn publish_without_any_name_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(&temp_dir, LoadMode::Permissive);
    let fp = pipeline
        .ingest("structure:\n  - {name: a.txt, type: file}\n", &YamlTranslator)
        .unwrap();
    let host = Arc::new(DryRunHost::new("octo"));

    let err = pipeline
        .publish(&fp, host.clone(), PublishOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "config");
    assert!(host.calls().is_empty());
}

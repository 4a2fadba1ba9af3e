//! Local Materializer
//!
//! Creates the directories and files of a specification tree under a root
//! directory. Re-running over the same tree yields the same final contents:
//! directory creation is idempotent and files are overwritten.
//!
//! The first filesystem failure aborts the run. Paths already created stay in
//! place; a rerun redoes the remaining work.

use super::plan::{Step, Walk};
use crate::error::{LocalAction, MaterializationError};
use crate::tree::SpecTree;
use std::path::{Path, PathBuf};

/// Paths touched by a local run, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalReport {
    pub root: PathBuf,
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

/// Materializes specification trees on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalMaterializer {
    root: PathBuf,
}

impl LocalMaterializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn materialize(&self, tree: &SpecTree) -> Result<LocalReport, MaterializationError> {
        create_directory(&self.root)?;

        let mut report = LocalReport {
            root: self.root.clone(),
            directories: Vec::new(),
            files: Vec::new(),
        };

        for step in Walk::new(tree) {
            let path = step
                .segments()
                .iter()
                .fold(self.root.clone(), |path, segment| path.join(segment));
            match step {
                Step::Directory { .. } => {
                    create_directory(&path)?;
                    tracing::debug!(path = %path.display(), "Created directory");
                    report.directories.push(path);
                }
                Step::File { content, .. } => {
                    write_file(&path, content)?;
                    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote file");
                    report.files.push(path);
                }
            }
        }

        tracing::info!(
            root = %self.root.display(),
            directories = report.directories.len(),
            files = report.files.len(),
            "Materialized specification locally"
        );
        Ok(report)
    }
}

fn create_directory(path: &Path) -> Result<(), MaterializationError> {
    std::fs::create_dir_all(path).map_err(|source| MaterializationError {
        path: path.to_path_buf(),
        action: LocalAction::CreateDirectory,
        source,
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), MaterializationError> {
    std::fs::write(path, content).map_err(|source| MaterializationError {
        path: path.to_path_buf(),
        action: LocalAction::WriteFile,
        source,
    })
}

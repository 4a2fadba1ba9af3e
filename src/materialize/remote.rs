//! Remote Materializer
//!
//! Replicates a specification tree as a populated repository: one
//! `create_file` call (and commit) per file, in traversal order. Hosts have
//! no primitive for empty directories, so a directory without children is
//! represented by a zero-byte `.gitkeep` inside it.
//!
//! File failures are best-effort: each is logged and recorded in the
//! [`RemoteReport`] and traversal continues. Repository creation failures
//! are fatal. A base path with `.` or `..` segments is rejected before the
//! host sees any call.

use super::plan::{Step, Walk};
use crate::error::{ApiError, RemoteError, ValidationError};
use crate::remote::{NewRepository, RepoHandle, RepositoryHost};
use crate::tree::{check_name, SpecTree};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

pub const PLACEHOLDER_FILE: &str = ".gitkeep";

/// Commit message templates. `{path}` is replaced with the file path for
/// files and with the directory path for placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessages {
    #[serde(default = "default_file_message")]
    pub file: String,
    #[serde(default = "default_placeholder_message")]
    pub placeholder: String,
}

fn default_file_message() -> String {
    "Add {path}".to_string()
}

fn default_placeholder_message() -> String {
    "Create directory {path}".to_string()
}

impl Default for CommitMessages {
    fn default() -> Self {
        Self {
            file: default_file_message(),
            placeholder: default_placeholder_message(),
        }
    }
}

impl CommitMessages {
    fn render(&self, kind: EntryKind, path: &str) -> String {
        let template = match kind {
            EntryKind::File => &self.file,
            EntryKind::Placeholder => &self.placeholder,
        };
        template.replace("{path}", path)
    }
}

/// Whether a remote file stands for a file node or an empty directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Placeholder,
}

/// Result of one `create_file` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathOutcome {
    pub path: String,
    pub kind: EntryKind,
    pub commit_message: String,
    pub result: Result<(), RemoteError>,
}

/// Per-path results of a remote run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteReport {
    pub repository: RepoHandle,
    pub base_path: String,
    pub outcomes: Vec<PathOutcome>,
}

impl RemoteReport {
    pub fn failures(&self) -> impl Iterator<Item = &PathOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn created_count(&self) -> usize {
        self.outcomes.len() - self.failure_count()
    }

    /// True when every path was created.
    pub fn is_complete(&self) -> bool {
        self.failure_count() == 0
    }
}

/// A file the remote backend must create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry<'a> {
    pub path: String,
    /// Path the commit message refers to: the file itself, or the directory
    /// a placeholder stands for.
    pub subject: String,
    pub kind: EntryKind,
    pub content: &'a str,
}

/// Flatten a tree into the files the remote backend creates, in order.
pub fn remote_entries<'a>(tree: &'a SpecTree, base_path: &str) -> Vec<RemoteEntry<'a>> {
    let base = normalize_base_path(base_path);
    let join = |relative: String| {
        if base.is_empty() {
            relative
        } else {
            format!("{}/{}", base, relative)
        }
    };

    Walk::new(tree)
        .filter_map(|step| {
            let relative = step.relative_path();
            match step {
                Step::File { content, .. } => {
                    let path = join(relative);
                    Some(RemoteEntry {
                        subject: path.clone(),
                        path,
                        kind: EntryKind::File,
                        content,
                    })
                }
                Step::Directory { empty: true, .. } => {
                    let directory = join(relative);
                    Some(RemoteEntry {
                        path: format!("{}/{}", directory, PLACEHOLDER_FILE),
                        subject: directory,
                        kind: EntryKind::Placeholder,
                        content: "",
                    })
                }
                Step::Directory { empty: false, .. } => None,
            }
        })
        .collect()
}

/// Strip leading, trailing and repeated slashes.
pub fn normalize_base_path(base_path: &str) -> String {
    base_path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalize `base_path` and reject segments that break a name rule.
pub fn checked_base_path(base_path: &str) -> Result<String, ValidationError> {
    let normalized = normalize_base_path(base_path);
    for segment in normalized.split('/').filter(|s| !s.is_empty()) {
        check_name(segment).map_err(|rule| ValidationError::InvalidName {
            path: normalized.clone(),
            rule,
        })?;
    }
    Ok(normalized)
}

/// Drives a [`RepositoryHost`] over specification trees.
pub struct RemoteMaterializer {
    host: Arc<dyn RepositoryHost>,
    messages: CommitMessages,
}

impl RemoteMaterializer {
    pub fn new(host: Arc<dyn RepositoryHost>) -> Self {
        Self::with_messages(host, CommitMessages::default())
    }

    pub fn with_messages(host: Arc<dyn RepositoryHost>, messages: CommitMessages) -> Self {
        Self { host, messages }
    }

    /// One repository creation call. Errors, including name collisions, are
    /// returned as-is and never retried.
    pub async fn create_repository(
        &self,
        request: &NewRepository,
    ) -> Result<RepoHandle, RemoteError> {
        self.host.create_repository(request).await.map_err(|e| {
            tracing::error!(repository = %request.name, error = %e, "Repository creation failed");
            e
        })
    }

    /// One file creation call.
    pub async fn create_file(
        &self,
        repo: &RepoHandle,
        path: &str,
        commit_message: &str,
        content: &str,
    ) -> Result<(), RemoteError> {
        self.host
            .create_file(repo, path, commit_message, content)
            .await
    }

    /// Create every file of `tree` under `base_path` in `repo`.
    ///
    /// Only an unsafe `base_path` is an error; file failures are in the report.
    pub async fn materialize_structure(
        &self,
        repo: &RepoHandle,
        tree: &SpecTree,
        base_path: &str,
    ) -> Result<RemoteReport, ValidationError> {
        let base_path = checked_base_path(base_path)?;
        let entries = remote_entries(tree, &base_path);
        Ok(self.run(repo, base_path, entries).await)
    }

    /// Create the repository, then populate it.
    pub async fn publish(
        &self,
        request: &NewRepository,
        tree: &SpecTree,
        base_path: &str,
    ) -> Result<RemoteReport, ApiError> {
        checked_base_path(base_path)?;
        let repo = self.create_repository(request).await?;
        Ok(self.materialize_structure(&repo, tree, base_path).await?)
    }

    /// Second pass over the paths that failed in `previous`.
    pub async fn retry_failed(
        &self,
        tree: &SpecTree,
        previous: &RemoteReport,
    ) -> Result<RemoteReport, ValidationError> {
        let base_path = checked_base_path(&previous.base_path)?;
        let failed: HashSet<&str> = previous.failures().map(|o| o.path.as_str()).collect();
        let entries = remote_entries(tree, &base_path)
            .into_iter()
            .filter(|entry| failed.contains(entry.path.as_str()))
            .collect();
        Ok(self.run(&previous.repository, base_path, entries).await)
    }

    async fn run(
        &self,
        repo: &RepoHandle,
        base_path: String,
        entries: Vec<RemoteEntry<'_>>,
    ) -> RemoteReport {
        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in entries {
            let commit_message = self.messages.render(entry.kind, &entry.subject);
            let result = self
                .create_file(repo, &entry.path, &commit_message, entry.content)
                .await;
            match &result {
                Ok(()) => tracing::debug!(
                    repository = %repo.full_name,
                    path = %entry.path,
                    "Created remote file"
                ),
                Err(error) => tracing::warn!(
                    repository = %repo.full_name,
                    path = %entry.path,
                    %error,
                    "Failed to create remote file, continuing"
                ),
            }
            outcomes.push(PathOutcome {
                path: entry.path,
                kind: entry.kind,
                commit_message,
                result,
            });
        }

        let report = RemoteReport {
            repository: repo.clone(),
            base_path,
            outcomes,
        };
        tracing::info!(
            repository = %repo.full_name,
            created = report.created_count(),
            failed = report.failure_count(),
            "Materialized specification remotely"
        );
        report
    }
}

//! Host that records calls instead of performing them.

use super::{NewRepository, RepoHandle, RepositoryHost};
use crate::error::RemoteError;
use async_trait::async_trait;
use parking_lot::Mutex;

/// A call received by [`DryRunHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    CreateRepository(NewRepository),
    CreateFile {
        repository: String,
        path: String,
        commit_message: String,
        content: String,
    },
}

/// Records every call in order and reports success.
#[derive(Debug)]
pub struct DryRunHost {
    owner: String,
    calls: Mutex<Vec<RecordedCall>>,
}

impl DryRunHost {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// `(path, commit_message, content)` of every recorded file creation.
    pub fn files(&self) -> Vec<(String, String, String)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::CreateFile {
                    path,
                    commit_message,
                    content,
                    ..
                } => Some((path.clone(), commit_message.clone(), content.clone())),
                RecordedCall::CreateRepository(_) => None,
            })
            .collect()
    }
}

impl Default for DryRunHost {
    fn default() -> Self {
        Self::new("dry-run")
    }
}

#[async_trait]
impl RepositoryHost for DryRunHost {
    async fn create_repository(&self, request: &NewRepository) -> Result<RepoHandle, RemoteError> {
        self.calls
            .lock()
            .push(RecordedCall::CreateRepository(request.clone()));
        Ok(RepoHandle {
            owner: self.owner.clone(),
            name: request.name.clone(),
            full_name: format!("{}/{}", self.owner, request.name),
            html_url: format!("dry-run://{}/{}", self.owner, request.name),
        })
    }

    async fn create_file(
        &self,
        repo: &RepoHandle,
        path: &str,
        commit_message: &str,
        content: &str,
    ) -> Result<(), RemoteError> {
        self.calls.lock().push(RecordedCall::CreateFile {
            repository: repo.full_name.clone(),
            path: path.to_string(),
            commit_message: commit_message.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }
}

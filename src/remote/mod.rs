//! Repository Hosting
//!
//! The capability the remote materializer drives: create a repository, then
//! create files in it one commit at a time. Hosts are injected at
//! construction and own their credentials.

pub mod dry_run;
pub mod github;

pub use dry_run::{DryRunHost, RecordedCall};
pub use github::GitHubHost;

use crate::error::RemoteError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Repository visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn is_private(&self) -> bool {
        matches!(self, Visibility::Private)
    }
}

/// Parameters for a repository creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRepository {
    pub name: String,
    pub visibility: Visibility,
    #[serde(default)]
    pub description: String,
}

/// Handle to a repository returned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoHandle {
    pub owner: String,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
}

/// Repository hosting API.
///
/// Each call is one network round-trip; each `create_file` is its own commit.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    async fn create_repository(&self, request: &NewRepository) -> Result<RepoHandle, RemoteError>;

    async fn create_file(
        &self,
        repo: &RepoHandle,
        path: &str,
        commit_message: &str,
        content: &str,
    ) -> Result<(), RemoteError>;
}

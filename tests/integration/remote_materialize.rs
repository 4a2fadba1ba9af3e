use async_trait::async_trait;
use parking_lot::Mutex;
use proptest::prelude::*;
use scaffold::error::{ApiError, NameRule, RemoteError, ValidationError};
use scaffold::materialize::{CommitMessages, EntryKind, RemoteMaterializer};
use scaffold::remote::{
    DryRunHost, NewRepository, RecordedCall, RepoHandle, RepositoryHost, Visibility,
};
use scaffold::tree::{Node, SpecTree};
use std::collections::HashSet;
use std::sync::Arc;

use crate::integration::support::{arb_tree, empty_directories, file_paths, sample_tree};

fn request(name: &str) -> NewRepository {
    NewRepository {
        name: name.to_string(),
        visibility: Visibility::Private,
        description: "test".to_string(),
    }
}

/// Fails `create_file` for the listed paths until `heal` is called.
struct FlakyHost {
    inner: DryRunHost,
    failing: Mutex<HashSet<String>>,
}

impl FlakyHost {
    fn new(failing: &[&str]) -> Self {
        Self {
            inner: DryRunHost::new("octo"),
            failing: Mutex::new(failing.iter().map(|p| p.to_string()).collect()),
        }
    }

    fn heal(&self) {
        self.failing.lock().clear();
    }
}

#[async_trait]
impl RepositoryHost for FlakyHost {
    async fn create_repository(&self, request: &NewRepository) -> Result<RepoHandle, RemoteError> {
        self.inner.create_repository(request).await
    }

    async fn create_file(
        &self,
        repo: &RepoHandle,
        path: &str,
        commit_message: &str,
        content: &str,
    ) -> Result<(), RemoteError> {
        if self.failing.lock().contains(path) {
            return Err(RemoteError::RateLimited {
                retry_after_secs: 30,
            });
        }
        self.inner
            .create_file(repo, path, commit_message, content)
            .await
    }
}

/// Rejects every repository creation as a name collision.
struct TakenHost;

#[async_trait]
impl RepositoryHost for TakenHost {
    async fn create_repository(&self, request: &NewRepository) -> Result<RepoHandle, RemoteError> {
        Err(RemoteError::AlreadyExists(request.name.clone()))
    }

    async fn create_file(
        &self,
        _repo: &RepoHandle,
        _path: &str,
        _commit_message: &str,
        _content: &str,
    ) -> Result<(), RemoteError> {
        panic!("no file may be created without a repository");
    }
}

#[tokio::test]
async fn sample_document_makes_two_file_calls_and_no_placeholder() {
    let host = Arc::new(DryRunHost::new("octo"));
    let messages = CommitMessages {
        file: "Ajout de {path}".to_string(),
        placeholder: "Création du dossier {path}".to_string(),
    };
    let materializer = RemoteMaterializer::with_messages(host.clone(), messages);

    let report = materializer
        .publish(&request("proj"), &sample_tree(), "")
        .await
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(
        host.files(),
        vec![
            (
                "src/main.txt".to_string(),
                "Ajout de src/main.txt".to_string(),
                "hi".to_string()
            ),
            (
                "README.md".to_string(),
                "Ajout de README.md".to_string(),
                "hello".to_string()
            ),
        ]
    );
    assert!(host.files().iter().all(|(p, _, _)| !p.ends_with(".gitkeep")));
}

#[tokio::test]
async fn empty_directory_becomes_single_gitkeep() {
    let host = Arc::new(DryRunHost::new("octo"));
    let tree = SpecTree::from_entries(vec![Node::directory("empty_dir", vec![])]).unwrap();
    let materializer = RemoteMaterializer::new(host.clone());

    let report = materializer.publish(&request("proj"), &tree, "").await.unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].kind, EntryKind::Placeholder);
    assert_eq!(
        host.files(),
        vec![(
            "empty_dir/.gitkeep".to_string(),
            "Create directory empty_dir".to_string(),
            String::new()
        )]
    );
}

#[tokio::test]
async fn file_failures_are_recorded_and_traversal_continues() {
    let host = Arc::new(FlakyHost::new(&["src/main.txt"]));
    let materializer = RemoteMaterializer::new(host.clone());
    let tree = sample_tree();

    let report = materializer.publish(&request("proj"), &tree, "").await.unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.created_count(), 1);
    let failed: Vec<_> = report.failures().map(|o| o.path.as_str()).collect();
    assert_eq!(failed, vec!["src/main.txt"]);
    // The sibling after the failure was still created.
    assert_eq!(host.inner.files().len(), 1);
    assert_eq!(host.inner.files()[0].0, "README.md");

    host.heal();
    let retry = materializer.retry_failed(&tree, &report).await.unwrap();
    assert!(retry.is_complete());
    assert_eq!(retry.outcomes.len(), 1);
    assert_eq!(retry.outcomes[0].path, "src/main.txt");
    assert_eq!(host.inner.files().len(), 2);
}

#[tokio::test]
async fn repository_collision_is_fatal() {
    let materializer = RemoteMaterializer::new(Arc::new(TakenHost));
    let err = materializer
        .publish(&request("taken"), &sample_tree(), "")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Remote(RemoteError::AlreadyExists(ref name)) if name == "taken"
    ));
}

#[tokio::test]
async fn base_path_prefixes_every_call() {
    let host = Arc::new(DryRunHost::new("octo"));
    let materializer = RemoteMaterializer::new(host.clone());
    let repo = host.create_repository(&request("proj")).await.unwrap();

    let report = materializer
        .materialize_structure(&repo, &sample_tree(), "/apps/web/")
        .await
        .unwrap();

    assert_eq!(report.base_path, "apps/web");
    let paths: Vec<_> = host
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            RecordedCall::CreateFile { path, .. } => Some(path),
            RecordedCall::CreateRepository(_) => None,
        })
        .collect();
    assert_eq!(paths, vec!["apps/web/src/main.txt", "apps/web/README.md"]);
}

#[tokio::test]
async fn parent_segments_in_base_path_are_rejected_before_any_call() {
    let host = Arc::new(DryRunHost::new("octo"));
    let materializer = RemoteMaterializer::new(host.clone());
    let repo = RepoHandle {
        owner: "octo".to_string(),
        name: "proj".to_string(),
        full_name: "octo/proj".to_string(),
        html_url: "https://example.invalid/octo/proj".to_string(),
    };

    for base in ["../../escape", "apps/../../etc", "./apps"] {
        let err = materializer
            .materialize_structure(&repo, &sample_tree(), base)
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                ValidationError::InvalidName {
                    rule: NameRule::RelativeSegment,
                    ..
                }
            ),
            "base path {:?}",
            base
        );
    }

    let err = materializer
        .publish(&request("proj"), &sample_tree(), "../../escape")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(host.calls().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn remote_calls_cover_files_and_empty_directories(tree in arb_tree()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let host = Arc::new(DryRunHost::new("octo"));
        let materializer = RemoteMaterializer::new(host.clone());
        runtime
            .block_on(materializer.publish(&request("p"), &tree, ""))
            .unwrap();

        let mut expected = Vec::new();
        file_paths(tree.root(), "", &mut expected);
        let mut empties = Vec::new();
        empty_directories(tree.root(), "", &mut empties);

        let calls: Vec<(String, String)> = host
            .files()
            .into_iter()
            .map(|(path, _, content)| (path, content))
            .collect();
        let placeholders: Vec<_> = calls
            .iter()
            .filter(|(p, _)| p.ends_with("/.gitkeep"))
            .cloned()
            .collect();

        prop_assert_eq!(calls.len(), expected.len() + empties.len());
        prop_assert_eq!(placeholders.len(), empties.len());
        for dir in &empties {
            let gitkeep = format!("{}/.gitkeep", dir);
            prop_assert!(placeholders.contains(&(gitkeep, String::new())));
        }
        for file in &expected {
            prop_assert!(calls.contains(file));
        }
    }
}

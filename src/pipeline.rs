//! Pipeline
//!
//! Ties the stages together: raw input is fingerprinted, translated and
//! stored once; a stored document is loaded into a validated tree on demand
//! and handed to one of the materializers. Each call owns its tree.

use crate::config::ScaffoldConfig;
use crate::document::{fingerprint, load_document, LoadedSpec, SpecTranslator};
use crate::error::{ApiError, ValidationError};
use crate::materialize::{LocalMaterializer, LocalReport, RemoteMaterializer, RemoteReport};
use crate::remote::{NewRepository, RepositoryHost, Visibility};
use crate::store::{DocumentStore, SledDocumentStore, StoredDocument};
use crate::tree::check_name;
use crate::types::Fingerprint;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const FALLBACK_DIR_NAME: &str = "project";

/// Fingerprint `raw`, translate it and persist the document.
///
/// Storing the same input twice is a no-op that returns the same fingerprint.
pub fn ingest(
    raw: &str,
    translator: &dyn SpecTranslator,
    store: &dyn DocumentStore,
) -> Result<Fingerprint, ApiError> {
    let fingerprint = fingerprint(raw.as_bytes());
    if store.contains(&fingerprint)? {
        tracing::debug!(fingerprint = %fingerprint, "Document already stored");
        return Ok(fingerprint);
    }
    let document = translator.translate(raw)?;
    store.save(&fingerprint, &document)?;
    tracing::info!(fingerprint = %fingerprint, "Stored specification document");
    Ok(fingerprint)
}

/// Overrides for a remote publish.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Repository name; defaults to the document's `project_name`.
    pub name: Option<String>,
    /// Defaults to `remote.visibility` from configuration.
    pub visibility: Option<Visibility>,
    /// Defaults to the document's `description`.
    pub description: Option<String>,
    /// Directory inside the repository to build under; empty for the root.
    pub base_path: String,
}

/// Stored documents plus the configuration that drives loading and building.
pub struct Pipeline {
    store: Arc<dyn DocumentStore>,
    config: ScaffoldConfig,
    workspace_root: PathBuf,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        config: ScaffoldConfig,
        workspace_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            config,
            workspace_root: workspace_root.into(),
        }
    }

    /// Open the sled store configured for `workspace_root`.
    pub fn open(workspace_root: &Path, config: ScaffoldConfig) -> Result<Self, ApiError> {
        let store_path = config.storage.resolve_store_path(workspace_root)?;
        let store = SledDocumentStore::open(&store_path)?;
        Ok(Self::new(Arc::new(store), config, workspace_root))
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    pub fn ingest(&self, raw: &str, translator: &dyn SpecTranslator) -> Result<Fingerprint, ApiError> {
        ingest(raw, translator, self.store.as_ref())
    }

    /// Fetch a stored document and load it with the configured mode.
    pub fn load(&self, fingerprint: &Fingerprint) -> Result<(StoredDocument, LoadedSpec), ApiError> {
        let stored = self.store.load(fingerprint)?;
        let loaded = load_document(&stored.document, self.config.loader.mode)?;
        if !loaded.report.is_clean() {
            tracing::warn!(
                fingerprint = %fingerprint,
                skipped = loaded.report.skipped.len(),
                "Loaded specification with skipped descriptors"
            );
        }
        Ok((stored, loaded))
    }

    /// Default build directory for a stored document:
    /// `<output.root>/<fingerprint>/<output_dir | project_name | "project">`.
    pub fn default_local_root(&self, stored: &StoredDocument) -> PathBuf {
        let dir_name = stored
            .document
            .local_dir_name()
            .unwrap_or(FALLBACK_DIR_NAME);
        self.config
            .output
            .resolve_root(&self.workspace_root)
            .join(stored.fingerprint.as_str())
            .join(dir_name)
    }

    /// Materialize a stored document on the local filesystem.
    pub fn build_local(
        &self,
        fingerprint: &Fingerprint,
        root: Option<PathBuf>,
    ) -> Result<LocalReport, ApiError> {
        let (stored, loaded) = self.load(fingerprint)?;
        let root = root.unwrap_or_else(|| self.default_local_root(&stored));
        Ok(LocalMaterializer::new(root).materialize(&loaded.tree)?)
    }

    /// Create a repository on `host` and populate it from a stored document.
    ///
    /// Repository creation errors are returned; per-file failures are in the
    /// report.
    pub async fn publish(
        &self,
        fingerprint: &Fingerprint,
        host: Arc<dyn RepositoryHost>,
        options: PublishOptions,
    ) -> Result<RemoteReport, ApiError> {
        let (stored, loaded) = self.load(fingerprint)?;
        let request = self.repository_request(&stored, &options)?;

        let materializer =
            RemoteMaterializer::with_messages(host, self.config.remote.commit_messages.clone());
        materializer
            .publish(&request, &loaded.tree, &options.base_path)
            .await
    }

    fn repository_request(
        &self,
        stored: &StoredDocument,
        options: &PublishOptions,
    ) -> Result<NewRepository, ApiError> {
        let name = options
            .name
            .clone()
            .or_else(|| stored.document.project_name.clone())
            .map(|n| n.trim().to_string())
            .ok_or_else(|| {
                ApiError::ConfigError(
                    "No repository name: pass --name or set project_name in the document"
                        .to_string(),
                )
            })?;
        check_name(&name).map_err(|rule| ValidationError::InvalidName {
            path: name.clone(),
            rule,
        })?;

        Ok(NewRepository {
            name,
            visibility: options.visibility.unwrap_or(self.config.remote.visibility),
            description: options
                .description
                .clone()
                .or_else(|| stored.document.description.clone())
                .unwrap_or_default(),
        })
    }
}

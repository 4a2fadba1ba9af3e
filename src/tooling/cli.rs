//! CLI Tooling
//!
//! Command-line interface over the pipeline: ingest raw specifications,
//! inspect stored documents and materialize them locally or on a repository
//! host.

use super::format as render;
use crate::config::{ConfigLoader, ScaffoldConfig};
use crate::document::YamlTranslator;
use crate::error::{ApiError, StorageError};
use crate::logging::LoggingConfig;
use crate::pipeline::{Pipeline, PublishOptions};
use crate::remote::{DryRunHost, GitHubHost, RepositoryHost, Visibility};
use crate::store::DocumentStore;
use crate::types::Fingerprint;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

/// Shortest fingerprint prefix accepted in place of a full fingerprint.
const MIN_PREFIX_LEN: usize = 6;

/// Scaffold CLI - build project structures from stored specifications
#[derive(Parser)]
#[command(name = "scaffold")]
#[command(about = "Materialize project specifications as directories or repositories")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Overlay logging flags on the configured logging section.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate and store a specification, printing its fingerprint
    Ingest {
        /// Specification file (YAML or JSON)
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List stored specifications
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Load and validate a stored specification
    Validate {
        /// Fingerprint or unique prefix
        id: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the tree of a stored specification
    Show {
        /// Fingerprint or unique prefix
        id: String,
        /// Subtree to print, relative to the root
        #[arg(long)]
        path: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Materialize a stored specification on the local filesystem
    Build {
        /// Fingerprint or unique prefix
        id: String,
        /// Target directory (default: <output.root>/<fingerprint>/<project>)
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Create a repository and populate it from a stored specification
    Publish {
        /// Fingerprint or unique prefix
        id: String,
        /// Repository name (default: project_name)
        #[arg(long)]
        name: Option<String>,
        /// Create a private repository
        #[arg(long)]
        private: bool,
        /// Repository description (default: document description)
        #[arg(long)]
        description: Option<String>,
        /// Directory inside the repository to build under
        #[arg(long, default_value = "")]
        base_path: String,
        /// Record host calls instead of performing them
        #[arg(long)]
        dry_run: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Rendered output of a command and whether it did everything it was asked.
///
/// Only a publish can be incomplete: per-path failures are part of its
/// report rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub output: String,
    pub complete: bool,
}

/// CLI context for executing commands against one workspace.
pub struct CliContext {
    workspace_root: PathBuf,
    pipeline: Pipeline,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(cfg_path) = &config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::with_config(workspace_root, config)
    }

    /// Create a context from an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: ScaffoldConfig) -> Result<Self, ApiError> {
        let pipeline = Pipeline::open(&workspace_root, config)?;
        Ok(Self {
            workspace_root,
            pipeline,
        })
    }

    pub fn workspace_root(&self) -> &PathBuf {
        &self.workspace_root
    }

    pub fn config(&self) -> &ScaffoldConfig {
        self.pipeline.config()
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        self.run(command).map(|outcome| outcome.output)
    }

    /// Execute a CLI command, keeping the completeness of a publish.
    pub fn run(&self, command: &Commands) -> Result<CommandOutcome, ApiError> {
        let mut complete = true;
        let output = match command {
            Commands::Ingest { file, format } => {
                let path = if file.is_absolute() {
                    file.clone()
                } else {
                    self.workspace_root.join(file)
                };
                let raw = std::fs::read_to_string(&path).map_err(|e| {
                    StorageError::IoError(std::io::Error::new(
                        e.kind(),
                        format!("failed to read specification {}: {}", path.display(), e),
                    ))
                })?;
                let fingerprint = self.pipeline.ingest(&raw, &YamlTranslator)?;
                match format {
                    OutputFormat::Text => Ok(fingerprint.to_string()),
                    OutputFormat::Json => to_json(&render::ingest_json(&fingerprint)),
                }
            }
            Commands::List { format } => {
                let fingerprints = self.pipeline.store().list()?;
                match format {
                    OutputFormat::Text => Ok(render::list_text(&fingerprints)),
                    OutputFormat::Json => to_json(&render::list_json(&fingerprints)),
                }
            }
            Commands::Validate { id, format } => {
                let fingerprint = self.resolve_id(id)?;
                let (stored, loaded) = self.pipeline.load(&fingerprint)?;
                match format {
                    OutputFormat::Text => Ok(render::validation_text(&stored, &loaded)),
                    OutputFormat::Json => to_json(&render::validation_json(&stored, &loaded)),
                }
            }
            Commands::Show { id, path, format } => {
                let fingerprint = self.resolve_id(id)?;
                let (stored, loaded) = self.pipeline.load(&fingerprint)?;
                let relative = path.as_deref().unwrap_or("");
                let node = loaded.tree.resolve(relative)?;
                match format {
                    OutputFormat::Text => {
                        let label = if relative.trim_matches('/').is_empty() {
                            stored
                                .document
                                .project_name
                                .clone()
                                .unwrap_or_else(|| fingerprint.short().to_string())
                        } else {
                            relative.trim_matches('/').to_string()
                        };
                        Ok(render::tree_text(node, &label))
                    }
                    OutputFormat::Json => {
                        let value = render::tree_json(node).map_err(serialization)?;
                        to_json(&value)
                    }
                }
            }
            Commands::Build { id, root, format } => {
                let fingerprint = self.resolve_id(id)?;
                let root = root.as_ref().map(|r| {
                    if r.is_absolute() {
                        r.clone()
                    } else {
                        self.workspace_root.join(r)
                    }
                });
                let report = self.pipeline.build_local(&fingerprint, root)?;
                match format {
                    OutputFormat::Text => Ok(render::local_text(&report)),
                    OutputFormat::Json => to_json(&render::local_json(&report)),
                }
            }
            Commands::Publish {
                id,
                name,
                private,
                description,
                base_path,
                dry_run,
                format,
            } => {
                let fingerprint = self.resolve_id(id)?;
                let host = self.repository_host(*dry_run)?;
                let options = PublishOptions {
                    name: name.clone(),
                    visibility: private.then_some(Visibility::Private),
                    description: description.clone(),
                    base_path: base_path.clone(),
                };

                let runtime = tokio::runtime::Runtime::new().map_err(|e| {
                    ApiError::ConfigError(format!("Failed to create async runtime: {}", e))
                })?;
                let report =
                    runtime.block_on(self.pipeline.publish(&fingerprint, host, options))?;
                complete = report.is_complete();
                match format {
                    OutputFormat::Text => Ok(render::remote_text(&report, *dry_run)),
                    OutputFormat::Json => to_json(&render::remote_json(&report, *dry_run)),
                }
            }
        }?;
        Ok(CommandOutcome { output, complete })
    }

    fn repository_host(&self, dry_run: bool) -> Result<Arc<dyn RepositoryHost>, ApiError> {
        if dry_run {
            return Ok(Arc::new(DryRunHost::default()));
        }
        let remote = &self.config().remote;
        let token = remote.resolve_token()?;
        let host = GitHubHost::new(&remote.api_base_url, token, &remote.user_agent)?;
        Ok(Arc::new(host))
    }

    /// Accept a full fingerprint or a unique prefix of a stored one.
    fn resolve_id(&self, id: &str) -> Result<Fingerprint, ApiError> {
        if let Ok(fingerprint) = id.parse::<Fingerprint>() {
            return Ok(fingerprint);
        }
        let prefix = id.trim().to_ascii_lowercase();
        if prefix.len() < MIN_PREFIX_LEN || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StorageError::InvalidFingerprint(id.to_string()).into());
        }
        let matches: Vec<Fingerprint> = self
            .pipeline
            .store()
            .list()?
            .into_iter()
            .filter(|fp| fp.as_str().starts_with(&prefix))
            .collect();
        match matches.as_slice() {
            [single] => Ok(single.clone()),
            [] => Err(StorageError::NotFound(id.to_string()).into()),
            _ => Err(ApiError::ConfigError(format!(
                "Ambiguous fingerprint prefix '{}' matches {} documents",
                id,
                matches.len()
            ))),
        }
    }
}

fn to_json(value: &serde_json::Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(serialization)
}

fn serialization(err: serde_json::Error) -> ApiError {
    StorageError::Serialization(err.to_string()).into()
}

/// JSON body for errors when `--format json` is active.
pub fn error_json(error: &ApiError) -> String {
    serde_json::json!({
        "error": {
            "kind": error.kind(),
            "message": error.to_string(),
        }
    })
    .to_string()
}

impl Commands {
    pub fn format(&self) -> OutputFormat {
        match self {
            Commands::Ingest { format, .. }
            | Commands::List { format }
            | Commands::Validate { format, .. }
            | Commands::Show { format, .. }
            | Commands::Build { format, .. }
            | Commands::Publish { format, .. } => *format,
        }
    }
}

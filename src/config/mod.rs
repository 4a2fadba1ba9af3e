//! Configuration
//!
//! Layered configuration loaded with the `config` crate. Precedence, lowest
//! first: built-in defaults, global file, workspace file, environment.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod workspace;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use workspace::remote::RemoteConfig;
pub use workspace::storage_paths::{OutputConfig, StorageConfig};

use crate::document::LoadMode;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Loader behaviour for stored documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// `permissive` skips malformed descriptors, `strict` rejects the document.
    #[serde(default)]
    pub mode: LoadMode,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

//! StorageConfig and OutputConfig: where documents live and where local
//! builds land.

use crate::config::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_STORE_PATH: &str = ".scaffold/store";

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the document store (relative to workspace root). The default
    /// value is redirected to the XDG data directory.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl StorageConfig {
    /// Resolve the document store location.
    pub fn resolve_store_path(&self, workspace_root: &Path) -> Result<PathBuf, ApiError> {
        if self.store_path == Path::new(DEFAULT_STORE_PATH) {
            let data_dir = xdg::workspace_data_dir(workspace_root)?;
            Ok(data_dir.join("documents"))
        } else {
            Ok(workspace_root.join(&self.store_path))
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

/// Local build output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Parent of every build directory (relative to workspace root unless absolute)
    #[serde(default = "default_output_root")]
    pub root: PathBuf,
}

impl OutputConfig {
    pub fn resolve_root(&self, workspace_root: &Path) -> PathBuf {
        workspace_root.join(&self.root)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
        }
    }
}

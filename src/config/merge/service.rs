//! MergeService: orchestrates sources, applies merge policy, deserializes to ScaffoldConfig.

use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::ScaffoldConfig;
use config::ConfigError;
use config::File;
use std::path::Path;

use super::policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from workspace and standard sources.
    /// Precedence: global file (lowest) -> workspace file -> environment (highest).
    pub fn load(workspace_root: &Path) -> Result<ScaffoldConfig, ConfigError> {
        let builder = policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<ScaffoldConfig, ConfigError> {
        let builder = policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}

//! Workspace config file: <workspace>/scaffold.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;

pub const WORKSPACE_CONFIG_FILE: &str = "scaffold.toml";

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = workspace_root.join(WORKSPACE_CONFIG_FILE);
    Ok(builder.add_source(File::from(path).required(false)))
}

//! Defaults layer applied beneath every other source.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the scalar defaults that env overrides rely on.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("loader.mode", "permissive")?
        .set_default("output.root", "output")?
        .set_default("remote.visibility", "public")
}

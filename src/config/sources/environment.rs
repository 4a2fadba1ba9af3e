//! Environment variable source: SCAFFOLD prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// Uses SCAFFOLD prefix and __ as separator for nested keys,
/// e.g. `SCAFFOLD__REMOTE__API_BASE_URL`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("SCAFFOLD")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}

use crate::error::ConfigError;
use crate::settings::Config;
use std::collections::HashMap;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    DisplaySettings, LoggingSettings, StorageBackend, StorageSettings, SummaryPolicy,
    SummarySettings,
};

/// The file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "splitbook.toml";

/// Environment variables with this prefix override file values,
/// e.g. `SPLITBOOK__SUMMARY__POLICY=proportional_capping`.
pub const ENV_PREFIX: &str = "SPLITBOOK";

/// Loads the application configuration.
///
/// With `Some(path)` the file must exist. With `None`, `splitbook.toml` in the
/// working directory is read if present and defaults are used otherwise. In both
/// cases `SPLITBOOK__*` environment variables are layered on top, and the result
/// is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    build_config(path, None)
}

fn build_config(
    path: Option<&Path>,
    env_override: Option<HashMap<String, String>>,
) -> Result<Config, ConfigError> {
    let (file, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };

    let builder = config::Config::builder()
        .add_source(config::File::from(file).required(required))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env_override),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

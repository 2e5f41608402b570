use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `splitbook.toml`; missing sections fall back to
/// their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub summary: SummarySettings,
    pub storage: StorageSettings,
    pub display: DisplaySettings,
    pub logging: LoggingSettings,
}

impl Config {
    /// Checks the cross-field rules that serde alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_connections must be greater than 0".to_string(),
            ));
        }
        if self.storage.backend == StorageBackend::Local && self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.path must be set for the local backend".to_string(),
            ));
        }
        if self.display.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "display.currency_symbol must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// How costs are charged against sales when computing the partner split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SummaryPolicy {
    /// Net profit is sales minus all costs, and may be negative.
    #[default]
    FullDeduction,
    /// Deducted costs are capped at total sales; net profit is never negative.
    ProportionalCapping,
}

/// Where sales, costs and customers are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// A JSON file on the local disk.
    #[default]
    Local,
    /// A PostgreSQL database reached through `DATABASE_URL`.
    Postgres,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    pub policy: SummaryPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// The JSON file used by the local backend.
    pub path: PathBuf,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            path: PathBuf::from("splitbook.json"),
            max_connections: 5,
            acquire_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub currency_symbol: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: "R$".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "splitbook.log".to_string(),
        }
    }
}

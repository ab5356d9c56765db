//! `lockrate.toml` configuration.
//!
//! Every field has a default, so an empty file (or no file) is valid. CLI
//! flags and `LOCKRATE_*` environment variables override file values.

use std::path::{Path, PathBuf};

use lockrate_types::LedgerParams;
use lockrate_utils::LogFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LockrateConfig {
    /// Directory of the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in MiB.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter directive, e.g. `"info"` or `"warn,lockrate_accrual=debug"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub ledger: LedgerParams,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./lockrate_data")
}

fn default_map_size_mb() -> usize {
    64
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl LockrateConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for LockrateConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size_mb: default_map_size_mb(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            ledger: LedgerParams::default(),
        }
    }
}

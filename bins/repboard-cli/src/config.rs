//! CLI configuration loaded from environment variables.
//!
//! Command-line flags override these values in `main`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Result};
use clap::ValueEnum;

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("log format must be \"text\" or \"json\", got {other:?}"),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Directory holding the RocksDB record store.
    pub data_dir: PathBuf,
    /// Path to the JSON balance snapshot used for vote eligibility.
    pub balances_path: Option<PathBuf>,
    /// Log level filter string (e.g. "info", "repboard_core=debug").
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            balances_path: None,
            log_level: "warn".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// - `REPBOARD_DATA_DIR`
    /// - `REPBOARD_BALANCES`
    /// - `REPBOARD_LOG_LEVEL`
    /// - `REPBOARD_LOG_FORMAT` (`text` or `json`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let log_format = match lookup("REPBOARD_LOG_FORMAT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("REPBOARD_LOG_FORMAT: {e}"))?,
            None => defaults.log_format,
        };

        Ok(Self {
            data_dir: lookup("REPBOARD_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            balances_path: lookup("REPBOARD_BALANCES").map(PathBuf::from),
            log_level: lookup("REPBOARD_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format,
        })
    }

    /// Path to the RocksDB record directory.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("records")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("repboard")
}

//! CLI configuration.
//!
//! Resolution order, highest priority first:
//! 1. CLI flags
//! 2. Environment variables (`TASKMGR_DB_PATH`, `TASKMGR_LOG_LEVEL`,
//!    `TASKMGR_LOG_DIR`, read through clap `env`)
//! 3. TOML file (`<config dir>/taskmgr/config.toml` or `--config`)
//! 4. Compiled defaults

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use taskmgr_core::DEFAULT_MAX_VALUE_BYTES;

const APP_DIR_NAME: &str = "taskmgr";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "tasks.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    NoDataDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read config file {}: {source}", path.display())
            }
            Self::ParseToml { path, source } => {
                write!(f, "failed to parse config file {}: {source}", path.display())
            }
            Self::NoDataDir => write!(
                f,
                "could not determine a data directory; pass --db and --log-dir"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseToml { source, .. } => Some(source),
            Self::NoDataDir => None,
        }
    }
}

/// `config.toml` layout; every field is an optional override.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    storage: StorageSection,
    logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StorageSection {
    db_path: Option<PathBuf>,
    max_value_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoggingSection {
    level: Option<String>,
    dir: Option<PathBuf>,
}

/// Values the user may pass on the command line or via environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub max_value_bytes: usize,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Config {
    /// Resolves settings using the platform config and data directories.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        let config_path = overrides.config.clone().or_else(|| {
            dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        });
        // An explicit `--config` must exist; the implicit one is optional.
        let file = match config_path {
            Some(path) if overrides.config.is_some() || path.exists() => read_config_file(&path)?,
            _ => ConfigFile::default(),
        };
        let data_dir = dirs::data_local_dir().map(|dir| dir.join(APP_DIR_NAME));
        Self::resolve(overrides, file, data_dir.as_deref())
    }

    fn resolve(
        overrides: &Overrides,
        file: ConfigFile,
        data_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let db_path = overrides
            .db_path
            .clone()
            .or(file.storage.db_path)
            .or_else(|| data_dir.map(|dir| dir.join(DB_FILE_NAME)))
            .ok_or(ConfigError::NoDataDir)?;
        let log_dir = overrides
            .log_dir
            .clone()
            .or(file.logging.dir)
            .or_else(|| data_dir.map(|dir| dir.join(LOG_DIR_NAME)))
            .ok_or(ConfigError::NoDataDir)?;
        let log_level = overrides
            .log_level
            .clone()
            .or(file.logging.level)
            .unwrap_or_else(|| taskmgr_core::default_log_level().to_string());

        Ok(Self {
            db_path,
            max_value_bytes: file
                .storage
                .max_value_bytes
                .unwrap_or(DEFAULT_MAX_VALUE_BYTES),
            log_level,
            log_dir,
        })
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_file(path, &raw)
}

fn parse_config_file(path: &Path, raw: &str) -> Result<ConfigFile, ConfigError> {
    toml::from_str(raw).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

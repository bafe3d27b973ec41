//! Runtime configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional
//! JSON file, then `TICKLIST_*` environment variables.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DATA_FILE: &str = "data/tasks.txt";
const ENV_DATA_FILE: &str = "TICKLIST_DATA_FILE";
const ENV_LOG_LEVEL: &str = "TICKLIST_LOG_LEVEL";
const ENV_LOG_DIR: &str = "TICKLIST_LOG_DIR";

/// Configuration load failure.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_level() -> String {
    default_log_level().to_string()
}

/// Settings the embedding application needs to start a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Stored-record file.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default = "default_level")]
    pub log_level: String,
    /// File logging is off when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_level: default_level(),
            log_dir: None,
        }
    }
}

impl TrackerConfig {
    /// Reads a JSON config file; a missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `TICKLIST_*` variables from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`; blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |name: &str| lookup(name).filter(|raw| !raw.trim().is_empty());
        if let Some(raw) = value(ENV_DATA_FILE) {
            self.data_file = PathBuf::from(raw.trim());
        }
        if let Some(raw) = value(ENV_LOG_LEVEL) {
            self.log_level = raw.trim().to_string();
        }
        if let Some(raw) = value(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(raw.trim()));
        }
        self
    }
}

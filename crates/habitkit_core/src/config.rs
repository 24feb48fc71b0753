//! TOML-based habitkit configuration.
//!
//! Stores where the habit database and rolling logs live and which log level
//! to use. Every field is optional; unset fields resolve to defaults under
//! the platform data directory (`<data>/habitkit/`).
//!
//! Configuration is read from `<config>/habitkit/config.toml` unless a path
//! is given explicitly.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR_NAME: &str = "habitkit";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "habitkit.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitConfig {
    /// SQLite database file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl HabitConfig {
    /// Loads config from `path`. A missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(toml::from_str(&text)?)
    }

    /// Writes config to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(io_err)
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| app_data_dir().join(DB_FILE_NAME))
    }

    pub fn resolved_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| app_data_dir().join(LOG_DIR_NAME))
    }
}

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Per-user data directory for the database and logs.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::HabitConfig;
    use crate::logging::default_log_level;
    use std::path::PathBuf;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HabitConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, HabitConfig::default());
        assert!(config.resolved_db_path().ends_with("habitkit.sqlite3"));
        assert!(config.resolved_log_dir().ends_with("logs"));
        assert_eq!(config.resolved_log_level(), default_log_level());
    }

    #[test]
    fn save_then_load_keeps_explicit_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = HabitConfig {
            db_path: Some(PathBuf::from("/var/lib/habitkit/habits.db")),
            log_level: Some("warn".to_string()),
            log_dir: None,
        };

        config.save(&path).unwrap();
        let loaded = HabitConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.resolved_log_level(), "warn");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "db_path = [").unwrap();
        let err = HabitConfig::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("invalid config file"));
    }
}

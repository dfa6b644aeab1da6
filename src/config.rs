//! Configuration for the taskboard server.
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. YAML config file: `--config`, else `$TASKBOARD_CONFIG_PATH`, else
//!    `taskboard.yaml` in the working directory when present
//! 3. Environment variables: `TASKBOARD_DB_PATH`, `TASKBOARD_PORT`
//! 4. CLI flags (applied by `main`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default port for the HTTP server.
pub const DEFAULT_PORT: u16 = 8370;

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file (default: `taskboard.db`).
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address to bind (default: 127.0.0.1).
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port for the HTTP server (default: 8370).
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            bind: default_bind(),
            port: default_port(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("taskboard.db")
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Config {
    /// Load configuration, merging file, environment, and defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit_path
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("TASKBOARD_CONFIG_PATH")
                    .ok()
                    .map(PathBuf::from)
            })
            .or_else(|| {
                let default = PathBuf::from("taskboard.yaml");
                default.exists().then_some(default)
            });

        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })?
            }
            None => Config::default(),
        };

        if let Ok(db_path) = std::env::var("TASKBOARD_DB_PATH") {
            config.server.db_path = db_path.into();
        }
        if let Ok(port) = std::env::var("TASKBOARD_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "TASKBOARD_PORT",
                value: port.clone(),
            })?;
        }

        Ok(config)
    }
}

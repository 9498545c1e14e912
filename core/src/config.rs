//! Application configuration
//!
//! Settings come from an optional TOML file, then environment overrides.
//! Every field has a default so an empty or partial file is valid.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::execution::history::{DEFAULT_CAPACITY, HISTORY_KEY};
use crate::playback::DEFAULT_BASE_DELAY;
use crate::storage::APP_DIR_NAME;

/// Overrides the API key from the file
pub const ENV_API_KEY: &str = "ALGOLENS_API_KEY";

/// Overrides the data directory
pub const ENV_DATA_DIR: &str = "ALGOLENS_DATA_DIR";

/// Overrides the model name
pub const ENV_MODEL: &str = "ALGOLENS_MODEL";

/// Overrides the API endpoint
pub const ENV_ENDPOINT: &str = "ALGOLENS_ENDPOINT";

const CONFIG_FILE_NAME: &str = "config.toml";

const MAX_BASE_DELAY_MS: u64 = 600_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Autoplay delay at 1x speed, in milliseconds
    pub base_delay_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: DEFAULT_BASE_DELAY.as_millis() as u64,
        }
    }
}

impl PlaybackConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Entries retained
    pub capacity: usize,

    /// Key of the persisted blob
    pub storage_key: String,

    /// Directory holding persisted data; platform data dir when unset
    pub data_dir: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            storage_key: HISTORY_KEY.to_owned(),
            data_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Base URL of the Generative Language API
    pub endpoint: String,

    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Inline API key; takes precedence over `api_key_env`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    pub timeout_secs: u64,

    pub temperature: f32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_owned(),
            model: "gemini-1.5-flash".to_owned(),
            api_key_env: "GEMINI_API_KEY".to_owned(),
            api_key: None,
            timeout_secs: 60,
            temperature: 0.3,
        }
    }
}

impl QueryConfig {
    /// Inline key, else the configured environment variable; blank counts as unset
    pub fn resolve_api_key(&self) -> Option<String> {
        let present = |key: &String| !key.trim().is_empty();
        self.api_key
            .clone()
            .filter(present)
            .or_else(|| env::var(&self.api_key_env).ok().filter(present))
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub playback: PlaybackConfig,
    pub history: HistoryConfig,
    pub query: QueryConfig,
}

impl AppConfig {
    /// Parse TOML text and validate
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Explicit file if given, else the per-user file if present, else defaults;
    /// environment overrides apply in every case
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => Self::load(&path)?,
                None => {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `ALGOLENS_*` environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(key) = env::var(ENV_API_KEY) {
            self.query.api_key = Some(key);
        }
        if let Ok(dir) = env::var(ENV_DATA_DIR) {
            self.history.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(model) = env::var(ENV_MODEL) {
            self.query.model = model;
        }
        if let Ok(endpoint) = env::var(ENV_ENDPOINT) {
            self.query.endpoint = endpoint;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.playback.base_delay_ms == 0 {
            return Err(ConfigError::Invalid("playback.base_delay_ms must be > 0".into()));
        }
        if self.playback.base_delay_ms > MAX_BASE_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "playback.base_delay_ms must be at most {MAX_BASE_DELAY_MS}"
            )));
        }
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid("history.capacity must be > 0".into()));
        }
        if self.history.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("history.storage_key is empty".into()));
        }
        if self.query.model.trim().is_empty() || self.query.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("query.model and query.endpoint are required".into()));
        }
        Ok(())
    }
}

/// `<config dir>/algolens/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

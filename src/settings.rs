//! # Settings Module
//!
//! ## Purpose
//! Application configuration of MolarCalc stored in a JSON file (molarcalc_config.json by default).
//! Missing file means default settings; a malformed file is an error.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "api_title": "Molar Mass Calculator",
//!   "atomic_masses_path": null,
//!   "history_path": "formula_history.json",
//!   "history_limit_default": 10,
//!   "pubchem_enabled": true,
//!   "pubchem_timeout_secs": 10,
//!   "pubchem_record_timeout_secs": 15,
//!   "pubchem_delay_ms": 100,
//!   "mass_unit": "g/mol",
//!   "log_level": "info"
//! }
//! ```
//! Absent fields take their default values.
//!
//! ## Usage
//! ```rust, ignore
//! use MolarCalc::settings::ConfigManager;
//!
//! let mut manager = ConfigManager::new()?;
//! manager.set_atomic_masses_path("data/atomic_masses.json")?;
//! let limit = manager.get_config().history_limit_default;
//! ```

use log::{LevelFilter, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "molarcalc_config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed config file '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("File does not exist: {0}")]
    MissingFile(String),
    #[error("Unknown log level: {0}")]
    UnknownLogLevel(String),
}

/// Configuration of the calculator, its data files and the PubChem lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_title: String,
    /// JSON file with element -> atomic mass; None means the built-in table
    pub atomic_masses_path: Option<String>,
    pub history_path: String,
    pub history_limit_default: usize,
    pub pubchem_enabled: bool,
    pub pubchem_timeout_secs: u64,
    pub pubchem_record_timeout_secs: u64,
    pub pubchem_delay_ms: u64,
    pub mass_unit: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_title: "Molar Mass Calculator".to_string(),
            atomic_masses_path: None,
            history_path: "formula_history.json".to_string(),
            history_limit_default: 10,
            pubchem_enabled: true,
            pubchem_timeout_secs: 10,
            pubchem_record_timeout_secs: 15,
            pubchem_delay_ms: 100,
            mass_unit: "g/mol".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::UnknownLogLevel(self.log_level.clone()))
    }

    pub fn pubchem_timeout(&self) -> Duration {
        Duration::from_secs(self.pubchem_timeout_secs)
    }

    pub fn pubchem_record_timeout(&self) -> Duration {
        Duration::from_secs(self.pubchem_record_timeout_secs)
    }

    pub fn pubchem_delay(&self) -> Duration {
        Duration::from_millis(self.pubchem_delay_ms)
    }
}

/// Loads, updates and persists the application configuration.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    config_file: String,
}

impl ConfigManager {
    /// manager of the default config file in the current directory
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    pub fn with_config_file(config_file: &str) -> Result<Self, ConfigError> {
        let config = Self::load_config(config_file)?;
        Ok(Self {
            config,
            config_file: config_file.to_string(),
        })
    }

    fn load_config(config_file: &str) -> Result<AppConfig, ConfigError> {
        if !Path::new(config_file).exists() {
            return Ok(AppConfig::default());
        }
        let content = fs::read_to_string(config_file).map_err(|source| ConfigError::Io {
            path: config_file.to_string(),
            source,
        })?;
        let config: AppConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: config_file.to_string(),
                source,
            })?;
        info!("Configuration loaded from '{}'", config_file);
        Ok(config)
    }

    /// writes the configuration as pretty JSON
    pub fn save_config(&self) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(&self.config).map_err(|source| ConfigError::Json {
                path: self.config_file.clone(),
                source,
            })?;
        fs::write(&self.config_file, content).map_err(|source| ConfigError::Io {
            path: self.config_file.clone(),
            source,
        })?;
        Ok(())
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// The file must exist. Saves the configuration after the update.
    pub fn set_atomic_masses_path(&mut self, path: &str) -> Result<(), ConfigError> {
        if !Path::new(path).exists() {
            return Err(ConfigError::MissingFile(path.to_string()));
        }
        self.config.atomic_masses_path = Some(path.to_string());
        self.save_config()
    }

    pub fn set_history_path(&mut self, path: &str) -> Result<(), ConfigError> {
        self.config.history_path = path.to_string();
        self.save_config()
    }

    pub fn set_log_level(&mut self, level: &str) -> Result<(), ConfigError> {
        level
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::UnknownLogLevel(level.to_string()))?;
        self.config.log_level = level.to_string();
        self.save_config()
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), ConfigError> {
        self.config = AppConfig::default();
        self.save_config()
    }
}

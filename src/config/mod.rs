//! # Configuration Management Module
//!
//! This module handles all configuration aspects of Rede, providing a
//! centralized configuration system with defaults and persistence.
//!
//! ## Features
//!
//! - **Structured Configuration**: Type-safe configuration with serde serialization
//! - **Defaults**: Sensible default values for all configuration options
//! - **TOML Format**: Human-readable configuration files
//!
//! ## Configuration Structure
//!
//! The configuration is organized into logical sections:
//!
//! - [`StorageConfig`] - Snapshot persistence settings
//! - [`LoggingConfig`] - Logging and debugging settings
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rede::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration from file
//!     let config = Config::load("config.toml").await?;
//!     println!("Snapshot file: {}", config.storage.data_file);
//!
//!     // Create default configuration
//!     Config::create_default("config.toml").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [storage]
//! data_file = "data/rede.snapshot"
//!
//! [logging]
//! level = "info"
//! file = "rede.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the binary snapshot the whole graph persists to.
    pub data_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of "error", "warn", "info", "debug", "trace".
    pub level: String,
    /// Optional log file; stderr is still echoed on a TTY.
    pub file: Option<String>,
}

impl LoggingConfig {
    /// Convert the configured level to a filter.
    ///
    /// Invalid values default to `Info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.level.to_lowercase().as_str() {
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => {
                eprintln!("Invalid log level '{}', defaulting to info", self.level);
                log::LevelFilter::Info
            }
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Reuse an already-loaded configuration, or read it from `path` now.
    /// The file is touched only when nothing was preloaded.
    pub async fn resolve(preloaded: Option<Config>, path: &str) -> Result<Self> {
        match preloaded {
            Some(config) => Ok(config),
            None => Config::load(path).await,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageConfig {
                data_file: "data/rede.snapshot".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("rede.log".to_string()),
            },
        }
    }
}

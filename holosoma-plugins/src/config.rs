//! Configuration file loading
//!
//! This module handles loading and parsing the CLI configuration from
//! `$XDG_CONFIG_HOME/holosoma/plugins.toml`. A missing default file means
//! the built-in defaults are used.

use anyhow::{Context, Result};
use holosoma_runtime::SearchPaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Package discovery configuration
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

/// Package discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoveryConfig {
    /// Directories scanned before the default search paths
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
    /// Whether to scan `$HOLOSOMA_PLUGIN_PATH`, user and system directories
    /// Default: true
    #[serde(default = "default_include_default_paths")]
    pub include_default_paths: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Default: "info"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_include_default_paths() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            include_default_paths: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from the specified path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default XDG config location
    ///
    /// Falls back to [`Config::default`] when the file does not exist.
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        Self::load(&config_path)
    }

    /// Get the default configuration file path
    ///
    /// Returns `$XDG_CONFIG_HOME/holosoma/plugins.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "holosoma")
            .context("Failed to determine project directories")?;

        Ok(dirs.config_dir().join("plugins.toml"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log.level.as_str()) {
            anyhow::bail!(
                "Invalid log.level: {}. Must be one of: {}",
                self.log.level,
                valid_log_levels.join(", ")
            );
        }

        if self
            .discovery
            .search_paths
            .iter()
            .any(|p| p.as_os_str().is_empty())
        {
            anyhow::bail!("discovery.search_paths must not contain empty entries");
        }

        Ok(())
    }

    /// Build the package search paths, configured directories first
    pub fn search_paths(&self) -> SearchPaths {
        let mut paths = SearchPaths::new(self.discovery.search_paths.iter().cloned());

        if self.discovery.include_default_paths {
            for dir in SearchPaths::from_env().dirs() {
                paths.push(dir.clone());
            }
        }

        paths
    }
}

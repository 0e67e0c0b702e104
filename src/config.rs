//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::quick_keys::DEFAULT_SYMBOLS;
use crate::constants::APP_NAME;
use crate::services::QuickKeyRegistry;
use crate::sync::transport::default_socket_path;

/// Log levels accepted in `[logging] level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Layouts file (defaults to `layouts.json` in the config directory)
    pub layouts_file: Option<PathBuf>,
    /// Socket of the running tiler (defaults to the runtime directory)
    pub ipc_socket: Option<PathBuf>,
}

impl PathConfig {
    /// Effective layouts file path.
    pub fn layouts_file(&self) -> Result<PathBuf> {
        match &self.layouts_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_dir()?.join("layouts.json")),
        }
    }

    /// Effective socket path.
    pub fn ipc_socket(&self) -> Result<PathBuf> {
        match &self.ipc_socket {
            Some(path) => Ok(path.clone()),
            None => default_socket_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Quick-key table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickKeyConfig {
    /// Key symbols offered in the picker
    pub symbols: Vec<String>,
}

impl Default for QuickKeyConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl QuickKeyConfig {
    /// Empty key table with the configured symbols.
    pub fn registry(&self) -> QuickKeyRegistry {
        QuickKeyRegistry::with_symbols(self.symbols.iter().cloned())
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/ZoneKeys/config.toml`
/// - macOS: `~/Library/Application Support/ZoneKeys/config.toml`
/// - Windows: `%APPDATA%\ZoneKeys\config.toml`
///
/// # Validation
///
/// - `logging.level` must be one of trace, debug, info, warn, error
/// - `quick_keys.symbols` must be unique numbers in 0-255
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Quick-key table
    #[serde(default)]
    pub quick_keys: QuickKeyConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/ZoneKeys/`
    /// - macOS: `~/Library/Application Support/ZoneKeys/`
    /// - Windows: `%APPDATA%\ZoneKeys\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from `path`, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the default config file.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to `path` atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context(format!(
                "Failed to create config directory: {}",
                dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = path.with_extension("toml.tmp");
        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        // Atomic rename
        fs::rename(&temp_path, path).context(format!(
            "Failed to rename temp config file to: {}",
            path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}': expected one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            );
        }

        if self.quick_keys.symbols.is_empty() {
            anyhow::bail!("At least one quick key symbol must be configured");
        }
        let mut seen = HashSet::new();
        for symbol in &self.quick_keys.symbols {
            let canonical = symbol.parse::<u8>().ok().map(|n| n.to_string());
            if canonical.as_deref() != Some(symbol.as_str()) {
                anyhow::bail!("Invalid quick key symbol '{symbol}': expected a number 0-255");
            }
            if !seen.insert(symbol) {
                anyhow::bail!("Duplicate quick key symbol '{symbol}'");
            }
        }

        Ok(())
    }
}

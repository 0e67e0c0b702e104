//! Application-wide settings shared by every module.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// General settings: per-module enabled flags and startup behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Module name → enabled. Modules not listed are enabled.
    #[serde(default)]
    pub enabled: BTreeMap<String, bool>,
    /// Launch the tiler at login
    #[serde(default)]
    pub run_at_startup: bool,
}

impl GeneralSettings {
    /// Whether `module` is enabled.
    pub fn is_enabled(&self, module: &str) -> bool {
        self.enabled.get(module).copied().unwrap_or(true)
    }

    /// Sets the enabled flag of `module`. Returns true if it changed.
    pub fn set_enabled(&mut self, module: &str, enabled: bool) -> bool {
        if self.is_enabled(module) == enabled {
            return false;
        }
        self.enabled.insert(module.to_string(), enabled);
        true
    }
}

/// Owner of a settings object that knows how to persist it.
pub trait SettingsRepository<T> {
    /// Current settings.
    fn settings(&self) -> &T;

    /// Current settings for in-place edits. Call [`SettingsRepository::save`]
    /// afterwards.
    fn settings_mut(&mut self) -> &mut T;

    /// Persists the current settings.
    fn save(&mut self) -> Result<()>;
}

/// Repository that keeps settings in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsRepository<T> {
    settings: T,
    saves: usize,
}

impl<T> MemorySettingsRepository<T> {
    /// Wraps `settings`.
    pub const fn new(settings: T) -> Self {
        Self { settings, saves: 0 }
    }

    /// Number of times [`SettingsRepository::save`] was called.
    pub const fn save_count(&self) -> usize {
        self.saves
    }
}

impl<T> SettingsRepository<T> for MemorySettingsRepository<T> {
    fn settings(&self) -> &T {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut T {
        &mut self.settings
    }

    fn save(&mut self) -> Result<()> {
        self.saves += 1;
        Ok(())
    }
}

/// Repository backed by a JSON file, written atomically.
#[derive(Debug, Clone)]
pub struct JsonFileRepository<T> {
    path: PathBuf,
    settings: T,
}

impl<T> JsonFileRepository<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Opens the file at `path`, using defaults if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse settings file: {}", path.display()))?
        } else {
            T::default()
        };
        Ok(Self { path, settings })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> SettingsRepository<T> for JsonFileRepository<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn settings(&self) -> &T {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut T {
        &mut self.settings
    }

    fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(&self.settings).context("Failed to serialize settings")?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp settings file: {}", temp_path.display())
        })?;
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!("Failed to rename temp settings file to: {}", self.path.display())
        })?;

        info!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

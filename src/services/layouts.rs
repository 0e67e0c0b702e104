//! Layout file I/O service.
//!
//! This module centralizes all layouts-file operations: the whole
//! [`LayoutSet`] lives in one JSON document that is read and written as a
//! unit.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::{LayoutRecord, LayoutSet, LayoutWriter};

/// Service for loading and saving the layouts file.
///
/// Writes are atomic (temp file + rename) so the file is never left in a
/// half-written state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutStore {
    path: PathBuf,
}

impl LayoutStore {
    /// Creates a store for the file at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the layouts file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the layouts file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the layout set.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing, unreadable, or not a valid layout set.
    pub fn load(&self) -> Result<LayoutSet> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read layouts file: {}", self.path.display()))?;
        let set: LayoutSet = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse layouts file: {}", self.path.display()))?;
        info!(path = %self.path.display(), layouts = set.layouts.len(), "Loaded layouts");
        Ok(set)
    }

    /// Loads the layout set, or returns an empty one if the file is absent.
    pub fn load_or_default(&self) -> Result<LayoutSet> {
        if self.exists() {
            self.load()
        } else {
            Ok(LayoutSet::default())
        }
    }

    /// Saves the layout set atomically.
    pub fn save(&self, set: &LayoutSet) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create layouts directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(set).context("Failed to serialize layouts")?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp layouts file: {}", temp_path.display())
        })?;

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!("Failed to rename temp layouts file to: {}", self.path.display())
        })?;

        info!(path = %self.path.display(), layouts = set.layouts.len(), "Saved layouts");
        Ok(())
    }
}

/// Upserts one record into the file, leaving the others untouched.
impl LayoutWriter for LayoutStore {
    fn write_layout(&mut self, record: &LayoutRecord) -> Result<()> {
        let mut set = self.load_or_default()?;
        set.upsert_record(record.clone());
        self.save(&set)
    }
}

//! Shared CLI plumbing: error type, exit codes, and layouts-file access.

use crate::config::Config;
use crate::error::LayoutError;
use crate::models::LayoutIdentity;
use crate::services::{LayoutSession, LayoutStore};
use clap::Args;
use std::fmt;
use std::path::PathBuf;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Invalid input or rejected change
    ValidationError = 1,
    /// File, socket, or serialization failure
    IoError = 2,
    /// Referenced layout does not exist
    NotFound = 3,
}

/// Error returned by CLI commands.
#[derive(Debug)]
pub struct CliError {
    /// Exit code the process ends with
    pub code: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// I/O failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// Missing layout.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::NotFound,
            message: message.into(),
        }
    }

    /// Numeric process exit code.
    pub const fn exit_code(&self) -> i32 {
        self.code as i32
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<LayoutError> for CliError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::LayoutNotFound { .. } => Self::not_found(err.to_string()),
            LayoutError::Serialization(_) | LayoutError::MissingCollaborator(_) => {
                Self::io(err.to_string())
            }
            _ => Self::validation(err.to_string()),
        }
    }
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Options shared by every command that touches the layouts file.
#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Layouts file (defaults to the configured one)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl StoreArgs {
    /// Loads the effective configuration.
    pub fn load_config(&self) -> CliResult<Config> {
        let loaded = match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        };
        loaded.map_err(|e| CliError::io(format!("Failed to load config: {e:#}")))
    }

    /// Opens the layouts store.
    pub fn store(&self, config: &Config) -> CliResult<LayoutStore> {
        let path = match &self.file {
            Some(path) => path.clone(),
            None => config
                .paths
                .layouts_file()
                .map_err(|e| CliError::io(format!("Failed to resolve layouts file: {e:#}")))?,
        };
        Ok(LayoutStore::new(path))
    }

    /// Loads config, store, and a session built from the layouts file.
    pub fn open(&self) -> CliResult<(Config, LayoutStore, LayoutSession)> {
        let config = self.load_config()?;
        let store = self.store(&config)?;
        let set = store
            .load_or_default()
            .map_err(|e| CliError::io(format!("Failed to load layouts: {e:#}")))?;
        let session = LayoutSession::from_layout_set(&set, config.quick_keys.registry())
            .map_err(|e| CliError::validation(format!("Invalid layouts file: {e}")))?;
        Ok((config, store, session))
    }
}

/// Writes the session back to the store.
pub fn save_session(store: &LayoutStore, session: &LayoutSession) -> CliResult<()> {
    store
        .save(&session.snapshot())
        .map_err(|e| CliError::io(format!("Failed to save layouts: {e:#}")))
}

/// Resolves a layout given by identity or by name.
pub fn resolve_layout(session: &LayoutSession, reference: &str) -> CliResult<LayoutIdentity> {
    session
        .layouts()
        .find_by_uuid(reference)
        .or_else(|| session.layouts().find_by_name(reference))
        .map(|entry| *entry.identity())
        .ok_or_else(|| CliError::not_found(format!("Layout '{reference}' not found")))
}

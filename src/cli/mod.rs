//! CLI command handlers for ZoneKeys.
//!
//! Headless, scriptable access to the layouts file, the quick-key table, and
//! settings propagation.

pub mod common;
pub mod keys;
pub mod layouts;
pub mod sync;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use keys::KeysArgs;
pub use layouts::LayoutsArgs;
pub use sync::SyncArgs;

//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the layout/quick-key defaults
//! shared by the editor and the settings front-end.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "ZoneKeys";

/// The binary name of the application (used in command examples, lowercase).
pub const APP_BINARY_NAME: &str = "zonekeys";

/// Layout defaults applied to freshly created layouts.
pub mod layout {
    /// Default pixel radius within which a dragged window snaps to a zone.
    pub const DEFAULT_SENSITIVITY_RADIUS: u32 = 20;

    /// Zone count given to new template layouts.
    pub const DEFAULT_ZONE_COUNT: u32 = 3;

    /// Smallest template zone count the editor accepts.
    pub const MIN_ZONE_COUNT: u32 = 1;

    /// Largest template zone count the editor accepts.
    pub const MAX_ZONES: u32 = 40;

    /// Edge length of the square reference space template zones are laid out in.
    pub const ZONE_REFERENCE_EXTENT: u32 = 10_000;
}

/// Quick-key table constants.
pub mod quick_keys {
    /// Display symbol for "no quick key assigned".
    pub const NONE_SYMBOL: &str = "None";

    /// Key symbols available on a fresh installation.
    pub const DEFAULT_SYMBOLS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
}

/// IPC envelope constants.
pub mod ipc {
    /// Top-level key wrapping every module settings message.
    pub const MODULES_ROOT: &str = "powertoys";

    /// Top-level key wrapping general settings messages.
    pub const GENERAL_ROOT: &str = "general";

    /// Maximum message size (10 MB) accepted on the socket transport.
    pub const MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

    /// Socket file name inside the runtime directory.
    pub const SOCKET_FILE: &str = "zonekeys.sock";
}

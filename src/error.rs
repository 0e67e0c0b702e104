//! Error types for layout registry and settings operations.

use thiserror::Error;

/// Primary error type for the layout and quick-key core.
///
/// Every mutating operation validates its input before touching state, so
/// receiving one of these errors means nothing was changed.
#[derive(Error, Debug)]
pub enum LayoutError {
    // Construction errors
    /// A builder was finished without a required collaborator
    #[error("Required collaborator missing: {0}")]
    MissingCollaborator(&'static str),

    // Identity errors
    /// External identity string is not a GUID
    #[error("Invalid layout identity '{value}': {reason}")]
    InvalidIdentity {
        /// The rejected input
        value: String,
        /// Why it did not parse
        reason: String,
    },

    /// No layout with that identity
    #[error("Layout not found: {uuid}")]
    LayoutNotFound {
        /// Canonical identity that was looked up
        uuid: String,
    },

    // Quick key errors
    /// Quick-key symbol is neither a number nor `None`
    #[error("Invalid quick key '{symbol}': expected a number or 'None'")]
    InvalidQuickKey {
        /// The malformed symbol
        symbol: String,
    },

    /// Quick-key number missing from the table
    #[error("Unknown quick key '{symbol}': not present in the quick-key table")]
    UnknownQuickKey {
        /// A well-formed key the table does not offer
        symbol: String,
    },

    // Template errors
    /// Template zone count outside the allowed range
    #[error("Invalid zone count {value}: must be {min}-{max}")]
    InvalidZoneCount {
        /// Requested count
        value: u32,
        /// Smallest allowed count
        min: u32,
        /// Largest allowed count
        max: u32,
    },

    // Settings errors
    /// Picker index out of range
    #[error("Invalid {field} index {index}: expected 0-{max}")]
    InvalidIndex {
        /// Picker the index was meant for
        field: &'static str,
        /// Requested index
        index: usize,
        /// Largest valid index
        max: usize,
    },

    /// Rejected setting value or inbound structure
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Setting or structure that was rejected
        field: &'static str,
        /// What is wrong with the value
        reason: String,
    },

    // Propagation errors
    /// Envelope (de)serialization failed
    #[error("Failed to serialize settings: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LayoutError {
    /// Returns true if the error was caused by caller-supplied input and the
    /// caller can fix it by retrying with a different value.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentity { .. }
                | Self::InvalidQuickKey { .. }
                | Self::UnknownQuickKey { .. }
                | Self::InvalidZoneCount { .. }
                | Self::InvalidIndex { .. }
                | Self::InvalidValue { .. }
        )
    }
}

/// Result alias for the layout core.
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_count_message() {
        let err = LayoutError::InvalidZoneCount {
            value: 41,
            min: 1,
            max: 40,
        };
        assert_eq!(err.to_string(), "Invalid zone count 41: must be 1-40");
        assert!(err.is_user_recoverable());
    }

    #[test]
    fn test_missing_collaborator_not_recoverable() {
        let err = LayoutError::MissingCollaborator("settings repository");
        assert!(!err.is_user_recoverable());
        assert!(err.to_string().contains("settings repository"));
    }
}

//! Data models for layouts and their persisted forms.
//!
//! Models are independent of storage and IPC; services own the collections.

pub mod identity;
pub mod layout;
pub mod layout_set;
pub mod zones;

// Re-export all model types
pub use identity::LayoutIdentity;
pub use layout::{CloneOptions, LayoutEntry, LayoutKind, LayoutProperty, LayoutRecord, LayoutWriter};
pub use layout_set::LayoutSet;
pub use zones::{template_zones, ZoneRect};

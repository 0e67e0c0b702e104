//! The persisted and propagated layout aggregate.

use crate::models::identity::LayoutIdentity;
use crate::models::layout::LayoutRecord;
use crate::services::quick_keys::QuickKeyRecord;
use crate::sync::ModuleSettings;
use serde::{Deserialize, Serialize};

/// Every layout record plus the bound quick keys.
///
/// This is both the on-disk layouts file and the payload of the
/// `ZoneLayouts` IPC envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSet {
    /// Layout records in display order
    #[serde(default)]
    pub layouts: Vec<LayoutRecord>,
    /// Bound quick keys in key order
    #[serde(default)]
    pub quick_keys: Vec<QuickKeyRecord>,
}

impl LayoutSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record with the given identity, if present.
    pub fn find(&self, identity: &LayoutIdentity) -> Option<&LayoutRecord> {
        self.layouts.iter().find(|r| r.uuid == *identity)
    }

    /// Replaces the record with the same identity or appends it.
    ///
    /// Returns true when an existing record was replaced.
    pub fn upsert_record(&mut self, record: LayoutRecord) -> bool {
        match self.layouts.iter_mut().find(|r| r.uuid == record.uuid) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                self.layouts.push(record);
                false
            }
        }
    }

    /// Drops the record with `identity` and any key bound to it.
    pub fn remove_record(&mut self, identity: &LayoutIdentity) -> bool {
        let before = self.layouts.len();
        self.layouts.retain(|r| r.uuid != *identity);
        let canonical = identity.canonical();
        self.quick_keys.retain(|k| k.layout_id != canonical);
        self.layouts.len() != before
    }
}

impl ModuleSettings for LayoutSet {
    const MODULE_NAME: &'static str = "ZoneLayouts";
}

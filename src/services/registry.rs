//! Ordered collection of custom layouts.
//!
//! Entries are matched by canonical identity, never by position or name.
//! Collections stay small (tens of layouts), so lookups are linear scans.

use crate::models::{LayoutEntry, LayoutIdentity, LayoutRecord};
use crate::services::quick_keys::QuickKeyRegistry;
use tracing::debug;

/// The layout list. Owns every [`LayoutEntry`] it holds.
#[derive(Debug, Default)]
pub struct LayoutRegistry {
    entries: Vec<LayoutEntry>,
}

impl LayoutRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a layout by identity.
    ///
    /// An existing entry with the same identity is replaced in place, keeping
    /// its position; otherwise the entry is appended. Returns true when an
    /// existing entry was replaced. The replaced entry is dropped along with
    /// its subscribers.
    pub fn upsert(&mut self, entry: LayoutEntry) -> bool {
        if let Some(index) = self.position(entry.identity()) {
            debug!(uuid = %entry.identity(), index, "Replacing layout");
            self.entries[index] = entry;
            true
        } else {
            debug!(uuid = %entry.identity(), "Adding layout");
            self.entries.push(entry);
            false
        }
    }

    /// Removes a layout by identity. No-op if it is not present.
    pub fn remove(&mut self, identity: &LayoutIdentity) -> Option<LayoutEntry> {
        let index = self.position(identity)?;
        debug!(uuid = %identity, index, "Removing layout");
        Some(self.entries.remove(index))
    }

    /// Releases the layout's quick key, then removes it.
    ///
    /// Idempotent: deleting an absent layout does nothing.
    pub fn delete(
        &mut self,
        identity: &LayoutIdentity,
        keys: &mut QuickKeyRegistry,
    ) -> Option<LayoutEntry> {
        let index = self.position(identity)?;
        self.entries[index].release_quick_key(keys);
        self.remove(identity)
    }

    /// Index of the layout with `identity`.
    pub fn position(&self, identity: &LayoutIdentity) -> Option<usize> {
        self.entries.iter().position(|e| e.identity() == identity)
    }

    /// Looks a layout up by identity.
    pub fn get(&self, identity: &LayoutIdentity) -> Option<&LayoutEntry> {
        self.entries.iter().find(|e| e.identity() == identity)
    }

    /// Looks a layout up by identity for mutation.
    pub fn get_mut(&mut self, identity: &LayoutIdentity) -> Option<&mut LayoutEntry> {
        self.entries.iter_mut().find(|e| e.identity() == identity)
    }

    /// Looks a layout up by an externally supplied identity string.
    ///
    /// The string is normalized first, so case and braces do not matter.
    pub fn find_by_uuid(&self, uuid: &str) -> Option<&LayoutEntry> {
        let identity = LayoutIdentity::parse(uuid).ok()?;
        self.get(&identity)
    }

    /// First layout with the given display name.
    pub fn find_by_name(&self, name: &str) -> Option<&LayoutEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    /// Layouts in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, LayoutEntry> {
        self.entries.iter()
    }

    /// Layouts in display order, mutable.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, LayoutEntry> {
        self.entries.iter_mut()
    }

    /// Number of layouts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no layouts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of every layout's persisted fields.
    pub fn records(&self) -> Vec<LayoutRecord> {
        self.entries.iter().map(LayoutEntry::to_record).collect()
    }
}

impl<'a> IntoIterator for &'a LayoutRegistry {
    type Item = &'a LayoutEntry;
    type IntoIter = std::slice::Iter<'a, LayoutEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LayoutKind;
    use std::collections::HashSet;

    #[test]
    fn test_upsert_appends_new_entries() {
        let mut registry = LayoutRegistry::new();
        assert!(!registry.upsert(LayoutEntry::new("A", LayoutKind::Grid)));
        assert!(!registry.upsert(LayoutEntry::new("B", LayoutKind::Rows)));
        assert_eq!(registry.len(), 2);
        let names: Vec<&str> = registry.iter().map(LayoutEntry::name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut registry = LayoutRegistry::new();
        let a = LayoutEntry::new("A", LayoutKind::Grid);
        let id = *a.identity();
        registry.upsert(a);
        registry.upsert(LayoutEntry::new("B", LayoutKind::Rows));

        let mut edited = registry.get(&id).unwrap().clone();
        edited.set_name("A2");
        assert!(registry.upsert(edited));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.position(&id), Some(0));
        assert_eq!(registry.get(&id).unwrap().name(), "A2");
    }

    #[test]
    fn test_upsert_same_entry_twice_is_idempotent() {
        let mut registry = LayoutRegistry::new();
        let entry = LayoutEntry::new("A", LayoutKind::Grid);
        registry.upsert(entry.clone());
        let before = registry.records();
        registry.upsert(entry);
        assert_eq!(registry.records(), before);
    }

    #[test]
    fn test_identities_stay_unique() {
        let mut registry = LayoutRegistry::new();
        let a = LayoutEntry::new("A", LayoutKind::Grid);
        for _ in 0..5 {
            registry.upsert(a.clone());
            registry.upsert(LayoutEntry::new("other", LayoutKind::Custom));
        }
        let unique: HashSet<String> = registry.iter().map(LayoutEntry::uuid).collect();
        assert_eq!(unique.len(), registry.len());
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut registry = LayoutRegistry::new();
        registry.upsert(LayoutEntry::new("A", LayoutKind::Grid));
        assert!(registry.remove(&LayoutIdentity::new()).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_delete_releases_quick_key() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        let mut registry = LayoutRegistry::new();
        let mut a = LayoutEntry::new("A", LayoutKind::Grid);
        a.set_quick_key("6", &mut keys).unwrap();
        let id = *a.identity();
        registry.upsert(a);

        let removed = registry.delete(&id, &mut keys).unwrap();
        assert_eq!(removed.quick_key(), None);
        assert_eq!(keys.holder_of("6"), None);
        assert!(registry.is_empty());

        // Second delete is a no-op
        assert!(registry.delete(&id, &mut keys).is_none());
    }

    #[test]
    fn test_find_by_uuid_normalizes() {
        let mut registry = LayoutRegistry::new();
        let a = LayoutEntry::new("A", LayoutKind::Grid);
        let lower = a.uuid().to_lowercase();
        let bare = lower.trim_matches(|c| c == '{' || c == '}').to_string();
        registry.upsert(a);

        assert_eq!(registry.find_by_uuid(&lower).map(LayoutEntry::name), Some("A"));
        assert_eq!(registry.find_by_uuid(&bare).map(LayoutEntry::name), Some("A"));
        assert!(registry.find_by_uuid("nope").is_none());
    }
}

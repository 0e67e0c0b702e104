//! Layout editing session.
//!
//! A [`LayoutSession`] owns the layout registry, the quick-key table and an
//! optional sync channel for the [`LayoutSet`]. Every operation that touches
//! more than one of them runs here as a single call, so the table and the
//! layouts never disagree between calls.

use crate::error::{LayoutError, LayoutResult};
use crate::models::{LayoutEntry, LayoutIdentity, LayoutKind, LayoutProperty, LayoutSet};
use crate::notify::SubscriptionId;
use crate::services::quick_keys::{sort_symbols, QuickKeyEvent, QuickKeyRecord, QuickKeyRegistry};
use crate::services::registry::LayoutRegistry;
use crate::sync::{SettingsSyncChannel, Transport};
use tracing::{debug, info, warn};

/// Owned context for layout and quick-key edits.
#[derive(Debug)]
pub struct LayoutSession {
    layouts: LayoutRegistry,
    keys: QuickKeyRegistry,
    sync: Option<SettingsSyncChannel<LayoutSet>>,
}

impl Default for LayoutSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutSession {
    /// Creates an empty session with the default `0`-`9` key table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_keys(QuickKeyRegistry::with_default_keys())
    }

    /// Creates an empty session around an existing key table.
    #[must_use]
    pub fn with_keys(keys: QuickKeyRegistry) -> Self {
        Self {
            layouts: LayoutRegistry::new(),
            keys,
            sync: None,
        }
    }

    /// Rebuilds a session from a persisted layout set.
    ///
    /// The key table is loaded first and is authoritative. A layout record's
    /// own `quickKey` is only honoured when that key is still free. Keys
    /// bound to layouts missing from the set are freed.
    pub fn from_layout_set(set: &LayoutSet, mut keys: QuickKeyRegistry) -> LayoutResult<Self> {
        keys.apply_records(&set.quick_keys)?;

        let mut layouts = LayoutRegistry::new();
        for record in &set.layouts {
            let mut entry = LayoutEntry::from_record(record)?;
            if let Some(key) = record.quick_key {
                let symbol = key.to_string();
                let uuid = entry.uuid();
                if keys.contains_key(&symbol)
                    && keys.holder_of(&symbol).is_none()
                    && keys.key_for(&uuid).is_none()
                {
                    keys.select_key(&symbol, &uuid);
                }
            }
            entry.sync_quick_key(&keys);
            layouts.upsert(entry);
        }

        let mut session = Self {
            layouts,
            keys,
            sync: None,
        };
        session.free_orphaned_keys();
        info!(layouts = session.layouts.len(), "Loaded layout session");
        Ok(session)
    }

    /// Attaches an outbound transport. The current state becomes the
    /// baseline; only later changes are sent.
    #[must_use]
    pub fn with_sync(mut self, transport: impl Transport + 'static) -> Self {
        self.sync = Some(SettingsSyncChannel::new(self.snapshot(), transport));
        self
    }

    // === Views ===

    /// Persisted form of the whole session.
    pub fn snapshot(&self) -> LayoutSet {
        LayoutSet {
            layouts: self.layouts.records(),
            quick_keys: self.keys.to_records(),
        }
    }

    /// The layout list.
    pub const fn layouts(&self) -> &LayoutRegistry {
        &self.layouts
    }

    /// The quick-key table.
    pub const fn keys(&self) -> &QuickKeyRegistry {
        &self.keys
    }

    /// The sync channel, if one is attached.
    pub const fn sync(&self) -> Option<&SettingsSyncChannel<LayoutSet>> {
        self.sync.as_ref()
    }

    /// Key symbols the layout may pick: free keys plus its own.
    pub fn available_keys_for(&self, identity: &LayoutIdentity) -> Vec<String> {
        self.keys.available_keys_for(&identity.canonical())
    }

    // === Observation ===

    /// Subscribes to property changes of one layout.
    ///
    /// The subscription lives as long as that entry object: replacing the
    /// layout through [`LayoutSession::upsert`] drops it.
    pub fn subscribe_layout<F>(&mut self, identity: &LayoutIdentity, callback: F) -> LayoutResult<SubscriptionId>
    where
        F: FnMut(&LayoutProperty) + 'static,
    {
        Ok(self.entry_mut(identity)?.subscribe(callback))
    }

    /// Removes a layout subscription. Returns false if either is unknown.
    pub fn unsubscribe_layout(&mut self, identity: &LayoutIdentity, id: SubscriptionId) -> bool {
        self.layouts
            .get_mut(identity)
            .is_some_and(|entry| entry.unsubscribe(id))
    }

    /// Subscribes to quick-key binding changes.
    pub fn subscribe_quick_keys<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&QuickKeyEvent) + 'static,
    {
        self.keys.subscribe(callback)
    }

    /// Removes a quick-key subscription.
    pub fn unsubscribe_quick_keys(&mut self, id: SubscriptionId) -> bool {
        self.keys.unsubscribe(id)
    }

    // === Mutations ===

    /// Creates a layout with default parameters and returns its identity.
    pub fn create_layout(&mut self, name: impl Into<String>, kind: LayoutKind) -> LayoutResult<LayoutIdentity> {
        let entry = LayoutEntry::new(name, kind);
        let identity = *entry.identity();
        debug!(uuid = %identity, name = entry.name(), %kind, "Creating layout");
        self.layouts.upsert(entry);
        self.propagate()?;
        Ok(identity)
    }

    /// Inserts or replaces a layout by identity.
    ///
    /// The entry's quick key is re-derived from the table, which stays the
    /// source of truth. Returns true if an existing layout was replaced.
    pub fn upsert(&mut self, mut entry: LayoutEntry) -> LayoutResult<bool> {
        entry.sync_quick_key(&self.keys);
        let replaced = self.layouts.upsert(entry);
        self.propagate()?;
        Ok(replaced)
    }

    /// Assigns a quick key (or `"None"`) to a layout.
    ///
    /// Taking a key held by another layout moves it; the previous holder is
    /// resynced and ends up without a key.
    pub fn set_quick_key(&mut self, identity: &LayoutIdentity, symbol: &str) -> LayoutResult<bool> {
        // Resolved before anything moves; a holder that is not a layout
        // identity has no entry to resync
        let previous_holder = symbol
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(|key| self.keys.holder_of(&key.to_string()))
            .and_then(|holder| LayoutIdentity::parse(holder).ok())
            .filter(|holder| holder != identity);

        let entry = self
            .layouts
            .get_mut(identity)
            .ok_or_else(|| not_found(identity))?;
        if !entry.set_quick_key(symbol, &mut self.keys)? {
            return Ok(false);
        }

        if let Some(holder) = previous_holder {
            if let Some(previous) = self.layouts.get_mut(&holder) {
                previous.sync_quick_key(&self.keys);
            }
        }

        self.propagate()?;
        Ok(true)
    }

    /// Sets a layout's template zone count.
    pub fn set_template_zone_count(&mut self, identity: &LayoutIdentity, count: u32) -> LayoutResult<bool> {
        let changed = self.entry_mut(identity)?.set_template_zone_count(count)?;
        self.finish(changed)
    }

    /// Renames a layout.
    pub fn rename(&mut self, identity: &LayoutIdentity, name: impl Into<String>) -> LayoutResult<bool> {
        let changed = self.entry_mut(identity)?.set_name(name);
        self.finish(changed)
    }

    /// Changes a layout's kind.
    pub fn set_kind(&mut self, identity: &LayoutIdentity, kind: LayoutKind) -> LayoutResult<bool> {
        let changed = self.entry_mut(identity)?.set_kind(kind);
        self.finish(changed)
    }

    /// Changes a layout's snap radius.
    pub fn set_sensitivity_radius(&mut self, identity: &LayoutIdentity, radius: u32) -> LayoutResult<bool> {
        let changed = self.entry_mut(identity)?.set_sensitivity_radius(radius);
        self.finish(changed)
    }

    /// Copies a layout under a fresh identity, optionally renaming the copy.
    ///
    /// The copy holds no quick key.
    pub fn duplicate(&mut self, identity: &LayoutIdentity, name: Option<&str>) -> LayoutResult<LayoutIdentity> {
        let source = self
            .layouts
            .get(identity)
            .ok_or_else(|| not_found(identity))?;
        let mut copy = source.duplicate();
        if let Some(name) = name {
            copy.set_name(name);
        }
        let copy_identity = *copy.identity();
        debug!(source = %identity, copy = %copy_identity, "Duplicating layout");
        self.layouts.upsert(copy);
        self.propagate()?;
        Ok(copy_identity)
    }

    /// Deletes a layout, releasing its quick key. Returns false if absent.
    pub fn delete(&mut self, identity: &LayoutIdentity) -> LayoutResult<bool> {
        let removed = self.layouts.delete(identity, &mut self.keys).is_some();
        if removed {
            debug!(uuid = %identity, "Deleted layout");
        }
        self.finish(removed)
    }

    // === Inbound updates ===

    /// Replaces the key table with an externally originated one.
    ///
    /// Affected layouts are resynced and keys bound to unknown layouts are
    /// freed. Nothing is sent back. An invalid table is rejected as a whole.
    pub fn apply_inbound_quick_keys(&mut self, records: &[QuickKeyRecord]) -> LayoutResult<Vec<String>> {
        let mut changed = self.keys.apply_records(records)?;
        changed.extend(self.free_orphaned_keys());
        if !changed.is_empty() {
            sort_symbols(&mut changed);
            changed.dedup();
            self.resync_all();
            self.absorb_inbound();
        }
        Ok(changed)
    }

    /// Replaces the whole session state with an externally originated set.
    ///
    /// Layouts missing from `set` are dropped; the rest are rebuilt from
    /// their records. Nothing is sent back.
    pub fn apply_inbound(&mut self, set: &LayoutSet) -> LayoutResult<bool> {
        if self.snapshot() == *set {
            return Ok(false);
        }

        // Validate every record before touching state
        let entries = set
            .layouts
            .iter()
            .map(LayoutEntry::from_record)
            .collect::<LayoutResult<Vec<_>>>()?;

        self.keys.apply_records(&set.quick_keys)?;
        let mut layouts = LayoutRegistry::new();
        for entry in entries {
            layouts.upsert(entry);
        }
        self.layouts = layouts;
        self.free_orphaned_keys();
        self.resync_all();
        self.absorb_inbound();
        info!(layouts = self.layouts.len(), "Applied inbound layout set");
        Ok(true)
    }

    /// Parses a `ZoneLayouts` envelope and applies it.
    pub fn apply_inbound_message(&mut self, message: &str) -> LayoutResult<bool> {
        let set = crate::sync::parse_module_envelope::<LayoutSet>(message)?;
        self.apply_inbound(&set)
    }

    // === Internals ===

    fn entry_mut(&mut self, identity: &LayoutIdentity) -> LayoutResult<&mut LayoutEntry> {
        self.layouts.get_mut(identity).ok_or_else(|| not_found(identity))
    }

    /// Frees keys whose holder is not a layout in the registry.
    fn free_orphaned_keys(&mut self) -> Vec<String> {
        let orphaned: Vec<String> = self
            .keys
            .iter()
            .filter_map(|(symbol, bound)| {
                let holder = bound?;
                let known = self.layouts.find_by_uuid(holder).is_some();
                (!known).then(|| symbol.to_string())
            })
            .collect();
        for symbol in &orphaned {
            if let Some(holder) = self.keys.free_key(symbol) {
                warn!(symbol = %symbol, holder = %holder, "Freed quick key bound to unknown layout");
            }
        }
        orphaned
    }

    fn resync_all(&mut self) {
        for entry in self.layouts.iter_mut() {
            entry.sync_quick_key(&self.keys);
        }
    }

    fn finish(&mut self, changed: bool) -> LayoutResult<bool> {
        if changed {
            self.propagate()?;
        }
        Ok(changed)
    }

    fn propagate(&mut self) -> LayoutResult<()> {
        let snapshot = self.snapshot();
        if let Some(channel) = self.sync.as_mut() {
            channel.replace(snapshot)?;
        }
        Ok(())
    }

    fn absorb_inbound(&mut self) {
        let snapshot = self.snapshot();
        if let Some(channel) = self.sync.as_mut() {
            channel.apply_inbound(snapshot);
        }
    }
}

fn not_found(identity: &LayoutIdentity) -> LayoutError {
    LayoutError::LayoutNotFound {
        uuid: identity.canonical(),
    }
}

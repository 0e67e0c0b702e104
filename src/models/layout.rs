//! Layout entry and its persisted record.

use crate::constants::layout::{
    DEFAULT_SENSITIVITY_RADIUS, DEFAULT_ZONE_COUNT, MAX_ZONES, MIN_ZONE_COUNT,
};
use crate::constants::quick_keys::NONE_SYMBOL;
use crate::error::{LayoutError, LayoutResult};
use crate::models::identity::LayoutIdentity;
use crate::models::zones::{template_zones, ZoneRect};
use crate::notify::{ChangeNotifier, SubscriptionId};
use crate::services::quick_keys::QuickKeyRegistry;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Layout kind: a built-in template or a user-defined arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    /// No zones at all
    Blank,
    /// Overlapping cascading zones
    Focus,
    /// Side-by-side vertical strips
    Columns,
    /// Stacked horizontal strips
    Rows,
    /// Evenly divided grid
    Grid,
    /// Large centre zone with stacked side zones
    PriorityGrid,
    /// User-defined layout
    #[default]
    Custom,
}

impl LayoutKind {
    /// All kinds in display order.
    pub const ALL: [Self; 7] = [
        Self::Blank,
        Self::Focus,
        Self::Columns,
        Self::Rows,
        Self::Grid,
        Self::PriorityGrid,
        Self::Custom,
    ];

    /// The persisted `type` string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Focus => "focus",
            Self::Columns => "columns",
            Self::Rows => "rows",
            Self::Grid => "grid",
            Self::PriorityGrid => "priority-grid",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LayoutError::InvalidValue {
                field: "layout type",
                reason: format!(
                    "'{s}' is not one of {}",
                    Self::ALL.map(|k| k.as_str()).join(", ")
                ),
            })
    }
}

/// Observable properties of a [`LayoutEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutProperty {
    /// Display name changed
    Name,
    /// Layout kind changed
    Kind,
    /// Picker selection flag changed
    IsSelected,
    /// Applied flag changed
    IsApplied,
    /// Sensitivity radius changed
    SensitivityRadius,
    /// Quick key assignment changed
    QuickKey,
    /// Template zone count changed
    TemplateZoneCount,
    /// Derived "can add more zones" flag may have changed
    IsZoneAddingAllowed,
}

/// Persisted form of a layout.
///
/// Transient state (selection, applied flag, derived zones) is not part of
/// the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    /// Canonical identity; the sole matching key for upsert
    pub uuid: LayoutIdentity,
    /// Display name
    pub name: String,
    /// Layout kind
    #[serde(rename = "type")]
    pub kind: LayoutKind,
    /// Snap radius in pixels
    #[serde(default = "default_sensitivity_radius")]
    pub sensitivity_radius: u32,
    /// Template zone count
    #[serde(default = "default_zone_count")]
    pub zone_count: u32,
    /// Assigned quick key, absent when unassigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_key: Option<u8>,
}

const fn default_sensitivity_radius() -> u32 {
    DEFAULT_SENSITIVITY_RADIUS
}

const fn default_zone_count() -> u32 {
    DEFAULT_ZONE_COUNT
}

/// Destination for layout snapshots (file store, IPC batch, test recorder).
pub trait LayoutWriter {
    /// Writes one complete layout record.
    fn write_layout(&mut self, record: &LayoutRecord) -> Result<()>;
}

/// Options for [`LayoutEntry::duplicate_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloneOptions {
    /// Carry over the picker selection and applied flags
    pub keep_transient_flags: bool,
}

/// A single layout configuration.
///
/// Fields are private so the invariants hold: the zone count stays within
/// `[MIN_ZONE_COUNT, MAX_ZONES]`, derived zones always match the kind and
/// count, and quick keys only move through [`LayoutEntry::set_quick_key`].
///
/// `Clone` produces an edit copy: same identity, same fields, no subscribers.
/// Use [`LayoutEntry::duplicate`] for a new layout with a fresh identity.
#[derive(Debug)]
pub struct LayoutEntry {
    identity: LayoutIdentity,
    name: String,
    kind: LayoutKind,
    is_selected: bool,
    is_applied: bool,
    sensitivity_radius: u32,
    template_zone_count: u32,
    quick_key: Option<u8>,
    zones: Vec<ZoneRect>,
    notifier: ChangeNotifier<LayoutProperty>,
}

impl LayoutEntry {
    /// Creates a layout with a fresh identity and default parameters.
    pub fn new(name: impl Into<String>, kind: LayoutKind) -> Self {
        Self::with_identity(LayoutIdentity::new(), name, kind)
    }

    /// Creates a layout with a known identity and default parameters.
    pub fn with_identity(identity: LayoutIdentity, name: impl Into<String>, kind: LayoutKind) -> Self {
        Self {
            identity,
            name: name.into(),
            kind,
            is_selected: false,
            is_applied: false,
            sensitivity_radius: DEFAULT_SENSITIVITY_RADIUS,
            template_zone_count: DEFAULT_ZONE_COUNT,
            quick_key: None,
            zones: template_zones(kind, DEFAULT_ZONE_COUNT),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Rebuilds a layout from its persisted record.
    ///
    /// The quick key is taken from the record as-is; callers that own a
    /// [`QuickKeyRegistry`] reconcile it with [`LayoutEntry::sync_quick_key`].
    pub fn from_record(record: &LayoutRecord) -> LayoutResult<Self> {
        validate_zone_count(record.zone_count)?;
        Ok(Self {
            identity: record.uuid,
            name: record.name.clone(),
            kind: record.kind,
            is_selected: false,
            is_applied: false,
            sensitivity_radius: record.sensitivity_radius,
            template_zone_count: record.zone_count,
            quick_key: record.quick_key,
            zones: template_zones(record.kind, record.zone_count),
            notifier: ChangeNotifier::new(),
        })
    }

    /// Complete snapshot of the persisted fields.
    pub fn to_record(&self) -> LayoutRecord {
        LayoutRecord {
            uuid: self.identity,
            name: self.name.clone(),
            kind: self.kind,
            sensitivity_radius: self.sensitivity_radius,
            zone_count: self.template_zone_count,
            quick_key: self.quick_key,
        }
    }

    /// Hands a snapshot of this layout to a format-specific writer.
    pub fn persist(&self, writer: &mut dyn LayoutWriter) -> Result<()> {
        writer.write_layout(&self.to_record())
    }

    // === Accessors ===

    /// Immutable identity.
    pub const fn identity(&self) -> &LayoutIdentity {
        &self.identity
    }

    /// Canonical identity string.
    pub fn uuid(&self) -> String {
        self.identity.canonical()
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layout kind.
    pub const fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// True for user-defined layouts.
    pub fn is_custom(&self) -> bool {
        self.kind == LayoutKind::Custom
    }

    /// Whether the layout is selected in the picker (not persisted).
    pub const fn is_selected(&self) -> bool {
        self.is_selected
    }

    /// Whether the layout is applied to the current work area (not persisted).
    pub const fn is_applied(&self) -> bool {
        self.is_applied
    }

    /// Snap radius in pixels.
    pub const fn sensitivity_radius(&self) -> u32 {
        self.sensitivity_radius
    }

    /// Number of template zones.
    pub const fn template_zone_count(&self) -> u32 {
        self.template_zone_count
    }

    /// Whether another zone may be added to the template.
    pub const fn is_zone_adding_allowed(&self) -> bool {
        self.template_zone_count < MAX_ZONES
    }

    /// Assigned quick key, if any.
    pub const fn quick_key(&self) -> Option<u8> {
        self.quick_key
    }

    /// Quick key as shown in the picker: the digits, or `"None"`.
    pub fn quick_key_label(&self) -> String {
        self.quick_key
            .map_or_else(|| NONE_SYMBOL.to_string(), |key| key.to_string())
    }

    /// Derived template zones for the current kind and count.
    pub fn template_zones(&self) -> &[ZoneRect] {
        &self.zones
    }

    /// Key symbols this layout may pick: free keys plus its own.
    pub fn quick_keys_available(&self, keys: &QuickKeyRegistry) -> Vec<String> {
        keys.available_keys_for(&self.uuid())
    }

    // === Observation ===

    /// Subscribes to property changes.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&LayoutProperty) + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Removes a property-change subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    fn fire(&mut self, property: LayoutProperty) {
        self.notifier.notify(&property);
    }

    // === Plain setters ===

    /// Sets the display name. Returns true if it changed.
    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.name == name {
            return false;
        }
        debug!(uuid = %self.identity, old = %self.name, new = %name, "Renaming layout");
        self.name = name;
        self.fire(LayoutProperty::Name);
        true
    }

    /// Changes the layout kind and regenerates the template zones.
    pub fn set_kind(&mut self, kind: LayoutKind) -> bool {
        if self.kind == kind {
            return false;
        }
        self.kind = kind;
        self.zones = template_zones(kind, self.template_zone_count);
        self.fire(LayoutProperty::Kind);
        true
    }

    /// Sets the picker selection flag.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        if self.is_selected == selected {
            return false;
        }
        self.is_selected = selected;
        self.fire(LayoutProperty::IsSelected);
        true
    }

    /// Sets the applied flag.
    pub fn set_applied(&mut self, applied: bool) -> bool {
        if self.is_applied == applied {
            return false;
        }
        self.is_applied = applied;
        self.fire(LayoutProperty::IsApplied);
        true
    }

    /// Sets the snap radius.
    pub fn set_sensitivity_radius(&mut self, radius: u32) -> bool {
        if self.sensitivity_radius == radius {
            return false;
        }
        self.sensitivity_radius = radius;
        self.fire(LayoutProperty::SensitivityRadius);
        true
    }

    // === Setters with side effects ===

    /// Sets the template zone count.
    ///
    /// Values outside `[MIN_ZONE_COUNT, MAX_ZONES]` are rejected and leave
    /// the layout untouched. On change the zones are regenerated first, then
    /// `TemplateZoneCount` and `IsZoneAddingAllowed` fire in that order.
    pub fn set_template_zone_count(&mut self, count: u32) -> LayoutResult<bool> {
        validate_zone_count(count)?;
        if count == self.template_zone_count {
            return Ok(false);
        }

        debug!(uuid = %self.identity, old = self.template_zone_count, new = count, "Changing zone count");
        self.template_zone_count = count;
        self.zones = template_zones(self.kind, count);
        self.fire(LayoutProperty::TemplateZoneCount);
        self.fire(LayoutProperty::IsZoneAddingAllowed);
        Ok(true)
    }

    /// Assigns or clears the quick key.
    ///
    /// `symbol` is either [`NONE_SYMBOL`] or a number present in the
    /// quick-key table. The previously held key is released before the new
    /// one is bound. Binding a key held by another layout takes it over; the
    /// previous holder picks the loss up via [`LayoutEntry::sync_quick_key`].
    ///
    /// A malformed or unknown symbol returns an error and changes nothing.
    pub fn set_quick_key(&mut self, symbol: &str, keys: &mut QuickKeyRegistry) -> LayoutResult<bool> {
        let requested = parse_quick_key(symbol, keys)?;
        if requested == self.quick_key {
            return Ok(false);
        }

        let uuid = self.uuid();
        if let Some(previous) = self.quick_key {
            keys.release(&previous.to_string(), &uuid);
        }
        if let Some(key) = requested {
            keys.select_key(&key.to_string(), &uuid);
        }

        debug!(uuid = %uuid, key = ?requested, "Quick key assigned");
        self.quick_key = requested;
        self.fire(LayoutProperty::QuickKey);
        Ok(true)
    }

    /// Re-derives the quick key from the table. Returns true if it changed.
    pub fn sync_quick_key(&mut self, keys: &QuickKeyRegistry) -> bool {
        let bound = keys
            .key_for(&self.uuid())
            .and_then(|symbol| symbol.parse::<u8>().ok());
        if bound == self.quick_key {
            return false;
        }
        debug!(uuid = %self.identity, old = ?self.quick_key, new = ?bound, "Quick key resynced from table");
        self.quick_key = bound;
        self.fire(LayoutProperty::QuickKey);
        true
    }

    /// Releases the held quick key, if any. Used before deletion.
    pub fn release_quick_key(&mut self, keys: &mut QuickKeyRegistry) -> bool {
        let Some(key) = self.quick_key else {
            return false;
        };
        keys.release(&key.to_string(), &self.uuid());
        self.quick_key = None;
        self.fire(LayoutProperty::QuickKey);
        true
    }

    // === Cloning ===

    /// Creates a new layout with a fresh identity and the same persisted
    /// parameters. The copy holds no quick key and is neither selected nor
    /// applied.
    pub fn duplicate(&self) -> Self {
        self.duplicate_with(CloneOptions::default())
    }

    /// Like [`LayoutEntry::duplicate`], optionally keeping transient flags.
    pub fn duplicate_with(&self, options: CloneOptions) -> Self {
        Self {
            identity: LayoutIdentity::new(),
            name: self.name.clone(),
            kind: self.kind,
            is_selected: options.keep_transient_flags && self.is_selected,
            is_applied: options.keep_transient_flags && self.is_applied,
            sensitivity_radius: self.sensitivity_radius,
            template_zone_count: self.template_zone_count,
            quick_key: None,
            zones: self.zones.clone(),
            notifier: ChangeNotifier::new(),
        }
    }
}

impl Clone for LayoutEntry {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity,
            name: self.name.clone(),
            kind: self.kind,
            is_selected: self.is_selected,
            is_applied: self.is_applied,
            sensitivity_radius: self.sensitivity_radius,
            template_zone_count: self.template_zone_count,
            quick_key: self.quick_key,
            zones: self.zones.clone(),
            notifier: ChangeNotifier::new(),
        }
    }
}

fn validate_zone_count(count: u32) -> LayoutResult<()> {
    if (MIN_ZONE_COUNT..=MAX_ZONES).contains(&count) {
        Ok(())
    } else {
        Err(LayoutError::InvalidZoneCount {
            value: count,
            min: MIN_ZONE_COUNT,
            max: MAX_ZONES,
        })
    }
}

/// Parses a picker symbol into a key number, or `None` for the sentinel.
fn parse_quick_key(symbol: &str, keys: &QuickKeyRegistry) -> LayoutResult<Option<u8>> {
    let symbol = symbol.trim();
    if symbol == NONE_SYMBOL {
        return Ok(None);
    }

    let key: u8 = symbol.parse().map_err(|_| LayoutError::InvalidQuickKey {
        symbol: symbol.to_string(),
    })?;
    if !keys.contains_key(&key.to_string()) {
        return Err(LayoutError::UnknownQuickKey {
            symbol: symbol.to_string(),
        });
    }
    Ok(Some(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(entry: &mut LayoutEntry) -> Rc<RefCell<Vec<LayoutProperty>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        entry.subscribe(move |p| sink.borrow_mut().push(*p));
        seen
    }

    #[test]
    fn test_new_defaults() {
        let entry = LayoutEntry::new("Grid", LayoutKind::Grid);
        assert_eq!(entry.name(), "Grid");
        assert!(!entry.is_custom());
        assert!(!entry.is_selected());
        assert!(!entry.is_applied());
        assert_eq!(entry.sensitivity_radius(), DEFAULT_SENSITIVITY_RADIUS);
        assert_eq!(entry.template_zone_count(), DEFAULT_ZONE_COUNT);
        assert_eq!(entry.template_zones().len(), DEFAULT_ZONE_COUNT as usize);
        assert_eq!(entry.quick_key(), None);
        assert_eq!(entry.quick_key_label(), "None");
    }

    #[test]
    fn test_is_custom_tracks_kind() {
        let mut entry = LayoutEntry::new("Mine", LayoutKind::Custom);
        assert!(entry.is_custom());
        entry.set_kind(LayoutKind::Rows);
        assert!(!entry.is_custom());
    }

    #[test]
    fn test_kind_parse_and_display() {
        assert_eq!("priority-grid".parse::<LayoutKind>().unwrap(), LayoutKind::PriorityGrid);
        assert_eq!("GRID".parse::<LayoutKind>().unwrap(), LayoutKind::Grid);
        assert!("hexagon".parse::<LayoutKind>().is_err());
        assert_eq!(LayoutKind::Columns.to_string(), "columns");
    }

    #[test]
    fn test_set_name_notifies_only_on_change() {
        let mut entry = LayoutEntry::new("A", LayoutKind::Custom);
        let seen = recorder(&mut entry);

        assert!(entry.set_name("B"));
        assert!(!entry.set_name("B"));
        assert_eq!(*seen.borrow(), vec![LayoutProperty::Name]);
    }

    #[test]
    fn test_zone_count_change_regenerates_then_notifies_twice() {
        let mut entry = LayoutEntry::new("Cols", LayoutKind::Columns);
        let seen = recorder(&mut entry);

        assert!(entry.set_template_zone_count(5).unwrap());
        assert_eq!(entry.template_zones().len(), 5);
        assert_eq!(
            *seen.borrow(),
            vec![LayoutProperty::TemplateZoneCount, LayoutProperty::IsZoneAddingAllowed]
        );

        // Same value: no notifications
        assert!(!entry.set_template_zone_count(5).unwrap());
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_zone_count_above_max_rejected() {
        let mut entry = LayoutEntry::new("Cols", LayoutKind::Columns);
        entry.set_template_zone_count(MAX_ZONES).unwrap();
        assert!(!entry.is_zone_adding_allowed());

        let err = entry.set_template_zone_count(MAX_ZONES + 1).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidZoneCount { value: 41, .. }));
        assert_eq!(entry.template_zone_count(), MAX_ZONES);
        assert!(entry.set_template_zone_count(0).is_err());
    }

    #[test]
    fn test_set_quick_key_binds_and_releases() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        let mut entry = LayoutEntry::new("A", LayoutKind::Grid);
        let seen = recorder(&mut entry);

        assert!(entry.set_quick_key("3", &mut keys).unwrap());
        assert_eq!(entry.quick_key(), Some(3));
        assert_eq!(keys.holder_of("3"), Some(entry.uuid().as_str()));

        // Moving to another key frees the old one
        assert!(entry.set_quick_key("5", &mut keys).unwrap());
        assert_eq!(keys.holder_of("3"), None);
        assert_eq!(keys.key_for(&entry.uuid()), Some("5"));

        assert!(entry.set_quick_key("None", &mut keys).unwrap());
        assert_eq!(entry.quick_key(), None);
        assert_eq!(keys.key_for(&entry.uuid()), None);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_set_quick_key_malformed_changes_nothing() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        let mut entry = LayoutEntry::new("A", LayoutKind::Grid);
        entry.set_quick_key("2", &mut keys).unwrap();

        assert!(matches!(
            entry.set_quick_key("two", &mut keys),
            Err(LayoutError::InvalidQuickKey { .. })
        ));
        assert!(matches!(
            entry.set_quick_key("42", &mut keys),
            Err(LayoutError::UnknownQuickKey { .. })
        ));
        assert_eq!(entry.quick_key(), Some(2));
        assert_eq!(keys.key_for(&entry.uuid()), Some("2"));
    }

    #[test]
    fn test_sync_quick_key_follows_table() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        let mut a = LayoutEntry::new("A", LayoutKind::Grid);
        let mut b = LayoutEntry::new("B", LayoutKind::Rows);

        a.set_quick_key("1", &mut keys).unwrap();
        b.set_quick_key("1", &mut keys).unwrap();

        assert!(a.sync_quick_key(&keys));
        assert_eq!(a.quick_key(), None);
        assert!(!b.sync_quick_key(&keys));
        assert_eq!(b.quick_key(), Some(1));
    }

    #[test]
    fn test_duplicate_gets_fresh_identity_without_key() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        let mut entry = LayoutEntry::new("Grid", LayoutKind::Grid);
        entry.set_template_zone_count(6).unwrap();
        entry.set_selected(true);
        entry.set_quick_key("4", &mut keys).unwrap();

        let copy = entry.duplicate();
        assert_ne!(copy.identity(), entry.identity());
        assert_eq!(copy.name(), "Grid");
        assert_eq!(copy.template_zone_count(), 6);
        assert_eq!(copy.quick_key(), None);
        assert!(!copy.is_selected());

        let kept = entry.duplicate_with(CloneOptions {
            keep_transient_flags: true,
        });
        assert!(kept.is_selected());
        assert_eq!(kept.quick_key(), None);
    }

    #[test]
    fn test_clone_keeps_identity_drops_subscribers() {
        let mut entry = LayoutEntry::new("Grid", LayoutKind::Grid);
        let seen = recorder(&mut entry);

        let mut copy = entry.clone();
        assert_eq!(copy.identity(), entry.identity());
        copy.set_name("Other");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_record_round_trip() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        let mut entry = LayoutEntry::new("Focus", LayoutKind::Focus);
        entry.set_sensitivity_radius(35);
        entry.set_template_zone_count(12).unwrap();
        entry.set_quick_key("7", &mut keys).unwrap();
        entry.set_applied(true);

        let json = serde_json::to_string(&entry.to_record()).unwrap();
        let record: LayoutRecord = serde_json::from_str(&json).unwrap();
        let restored = LayoutEntry::from_record(&record).unwrap();

        assert_eq!(restored.to_record(), entry.to_record());
        assert!(!restored.is_applied());
        assert_eq!(restored.template_zones(), entry.template_zones());
    }

    #[test]
    fn test_record_wire_format() {
        let record = LayoutRecord {
            uuid: LayoutIdentity::parse("{11111111-2222-4333-8444-555555555555}").unwrap(),
            name: "Grid".to_string(),
            kind: LayoutKind::PriorityGrid,
            sensitivity_radius: 20,
            zone_count: 3,
            quick_key: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["uuid"], "{11111111-2222-4333-8444-555555555555}");
        assert_eq!(value["type"], "priority-grid");
        assert_eq!(value["sensitivityRadius"], 20);
        assert_eq!(value["zoneCount"], 3);
        assert!(value.get("quickKey").is_none());
    }

    #[test]
    fn test_from_record_rejects_bad_zone_count() {
        let mut record = LayoutEntry::new("X", LayoutKind::Rows).to_record();
        record.zone_count = 99;
        assert!(LayoutEntry::from_record(&record).is_err());
    }

    #[test]
    fn test_persist_hands_snapshot_to_writer() {
        struct Recorder(Vec<LayoutRecord>);
        impl LayoutWriter for Recorder {
            fn write_layout(&mut self, record: &LayoutRecord) -> Result<()> {
                self.0.push(record.clone());
                Ok(())
            }
        }

        let entry = LayoutEntry::new("Rows", LayoutKind::Rows);
        let mut writer = Recorder(Vec::new());
        entry.persist(&mut writer).unwrap();
        assert_eq!(writer.0, vec![entry.to_record()]);
    }
}

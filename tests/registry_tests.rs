//! Layout registry and quick-key behaviour through the public session API.

use std::cell::RefCell;
use std::rc::Rc;

use zonekeys::models::{LayoutEntry, LayoutIdentity, LayoutKind, LayoutSet};
use zonekeys::services::{LayoutSession, LayoutStore, QuickKeyRegistry};
use tempfile::TempDir;

fn fixed_id() -> LayoutIdentity {
    LayoutIdentity::parse("{11111111-1111-1111-1111-111111111111}").unwrap()
}

#[test]
fn test_upsert_same_identity_replaces_and_keeps_key() {
    let mut session = LayoutSession::new();
    let id = fixed_id();

    session
        .upsert(LayoutEntry::with_identity(id, "Grid", LayoutKind::Grid))
        .unwrap();
    session.set_quick_key(&id, "3").unwrap();

    let replaced = session
        .upsert(LayoutEntry::with_identity(id, "Grid2", LayoutKind::Grid))
        .unwrap();

    assert!(replaced);
    assert_eq!(session.layouts().len(), 1);
    let entry = session.layouts().get(&id).unwrap();
    assert_eq!(entry.name(), "Grid2");
    assert_eq!(entry.quick_key(), Some(3));
    assert_eq!(session.keys().holder_of("3"), Some(id.canonical().as_str()));
}

#[test]
fn test_identity_match_ignores_case_and_braces() {
    let mut session = LayoutSession::new();
    let id = fixed_id();
    session
        .upsert(LayoutEntry::with_identity(id, "Grid", LayoutKind::Grid))
        .unwrap();

    let bare = LayoutIdentity::parse("11111111-1111-1111-1111-111111111111").unwrap();
    assert!(session.layouts().get(&bare).is_some());
    assert!(session
        .layouts()
        .find_by_uuid("{11111111-1111-1111-1111-111111111111}".to_lowercase().as_str())
        .is_some());
}

#[test]
fn test_each_key_has_at_most_one_holder() {
    let mut session = LayoutSession::new();
    let a = session.create_layout("A", LayoutKind::Columns).unwrap();
    let b = session.create_layout("B", LayoutKind::Rows).unwrap();

    session.set_quick_key(&a, "1").unwrap();
    session.set_quick_key(&b, "1").unwrap();

    assert_eq!(session.layouts().get(&a).unwrap().quick_key(), None);
    assert_eq!(session.layouts().get(&b).unwrap().quick_key(), Some(1));
    let holders = session
        .keys()
        .iter()
        .filter(|(_, bound)| bound.is_some())
        .count();
    assert_eq!(holders, 1);
}

#[test]
fn test_available_keys_track_bindings() {
    let mut session = LayoutSession::new();
    let a = session.create_layout("A", LayoutKind::Grid).unwrap();
    let b = session.create_layout("B", LayoutKind::Grid).unwrap();
    session.set_quick_key(&a, "0").unwrap();

    assert!(!session.available_keys_for(&b).contains(&"0".to_string()));
    assert!(session.available_keys_for(&a).contains(&"0".to_string()));

    session.delete(&a).unwrap();
    assert!(session.available_keys_for(&b).contains(&"0".to_string()));
}

#[test]
fn test_quick_key_events_reach_subscribers() {
    let mut session = LayoutSession::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    session.subscribe_quick_keys(move |event| sink.borrow_mut().push(event.symbol.clone()));

    let id = session.create_layout("A", LayoutKind::Grid).unwrap();
    session.set_quick_key(&id, "4").unwrap();
    session.set_quick_key(&id, "5").unwrap();

    assert_eq!(*seen.borrow(), vec!["4", "4", "5"]);
}

#[test]
fn test_store_round_trip_preserves_bindings() {
    let temp_dir = TempDir::new().unwrap();
    let store = LayoutStore::new(temp_dir.path().join("nested").join("layouts.json"));

    let mut session = LayoutSession::new();
    let id = session.create_layout("Focus", LayoutKind::Focus).unwrap();
    session.set_template_zone_count(&id, 6).unwrap();
    session.set_quick_key(&id, "9").unwrap();
    store.save(&session.snapshot()).unwrap();

    let set: LayoutSet = store.load().unwrap();
    let reloaded = LayoutSession::from_layout_set(&set, QuickKeyRegistry::with_default_keys()).unwrap();
    let entry = reloaded.layouts().get(&id).unwrap();
    assert_eq!(entry.template_zone_count(), 6);
    assert_eq!(entry.template_zones().len(), 6);
    assert_eq!(entry.quick_key(), Some(9));
    assert_eq!(reloaded.snapshot(), session.snapshot());
}

#[test]
fn test_zone_count_bounds_leave_layout_untouched() {
    let mut session = LayoutSession::new();
    let id = session.create_layout("Grid", LayoutKind::Grid).unwrap();
    let before = session.layouts().get(&id).unwrap().template_zone_count();

    assert!(session.set_template_zone_count(&id, 0).is_err());
    assert!(session.set_template_zone_count(&id, 41).is_err());
    assert_eq!(
        session.layouts().get(&id).unwrap().template_zone_count(),
        before
    );
    assert!(session.set_template_zone_count(&id, 40).unwrap());
}

//! Global quick-key table.
//!
//! Maps key symbols to the canonical identity string of the layout bound to
//! them. The table holds identity strings only; layouts are resolved by
//! lookup in the [`LayoutRegistry`](crate::services::registry::LayoutRegistry).

use crate::constants::quick_keys::DEFAULT_SYMBOLS;
use crate::error::{LayoutError, LayoutResult};
use crate::models::identity::LayoutIdentity;
use crate::notify::{ChangeNotifier, SubscriptionId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// A binding change in the quick-key table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickKeyEvent {
    /// Key symbol whose binding changed
    pub symbol: String,
    /// Identity bound before the change
    pub previous: Option<String>,
    /// Identity bound after the change
    pub current: Option<String>,
}

/// Persisted/propagated form of one bound key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickKeyRecord {
    /// Key number
    pub key: u8,
    /// Canonical identity of the bound layout
    pub layout_id: String,
}

/// Symbol → bound layout identity.
///
/// Every known symbol has an entry; `None` means the key is free.
#[derive(Debug, Default)]
pub struct QuickKeyRegistry {
    bindings: BTreeMap<String, Option<String>>,
    notifier: ChangeNotifier<QuickKeyEvent>,
}

impl QuickKeyRegistry {
    /// Creates an empty table with no known symbols.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with the default `0`-`9` symbols, all free.
    #[must_use]
    pub fn with_default_keys() -> Self {
        Self::with_symbols(DEFAULT_SYMBOLS)
    }

    /// Creates a table with the given symbols, all free.
    pub fn with_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bindings: symbols.into_iter().map(|s| (s.into(), None)).collect(),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Returns true if `symbol` is part of the table.
    pub fn contains_key(&self, symbol: &str) -> bool {
        self.bindings.contains_key(symbol)
    }

    /// Every symbol that is free or already bound to `identity`.
    pub fn available_keys_for(&self, identity: &str) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, bound)| bound.as_deref().is_none_or(|id| id == identity))
            .map(|(symbol, _)| symbol.clone())
            .collect();
        sort_symbols(&mut symbols);
        symbols
    }

    /// Binds `symbol` to `identity`, overwriting any prior binding of the
    /// symbol. Unknown symbols are added to the table.
    ///
    /// The caller's previously held key is not touched: release it first.
    /// Returns the identity that held the symbol before, if any.
    pub fn select_key(&mut self, symbol: &str, identity: &str) -> Option<String> {
        let slot = self.bindings.entry(symbol.to_string()).or_default();
        let previous = slot.replace(identity.to_string());
        if previous.as_deref() != Some(identity) {
            debug!(symbol, identity, previous = ?previous, "Quick key bound");
            self.notifier.notify(&QuickKeyEvent {
                symbol: symbol.to_string(),
                previous: previous.clone(),
                current: Some(identity.to_string()),
            });
        }
        previous
    }

    /// Clears the binding of `symbol`. No-op if it is free or unknown.
    pub fn free_key(&mut self, symbol: &str) -> Option<String> {
        let previous = self.bindings.get_mut(symbol)?.take()?;
        debug!(symbol, identity = %previous, "Quick key freed");
        self.notifier.notify(&QuickKeyEvent {
            symbol: symbol.to_string(),
            previous: Some(previous.clone()),
            current: None,
        });
        Some(previous)
    }

    /// Clears the binding of `symbol` only if it is held by `identity`.
    pub fn release(&mut self, symbol: &str, identity: &str) -> bool {
        if self.holder_of(symbol) == Some(identity) {
            self.free_key(symbol).is_some()
        } else {
            false
        }
    }

    /// Identity bound to `symbol`, if any.
    pub fn holder_of(&self, symbol: &str) -> Option<&str> {
        self.bindings.get(symbol)?.as_deref()
    }

    /// Symbol bound to `identity`, if any. If the table were ever
    /// inconsistent the last match in symbol order wins.
    pub fn key_for(&self, identity: &str) -> Option<&str> {
        self.bindings
            .iter()
            .filter(|(_, bound)| bound.as_deref() == Some(identity))
            .map(|(symbol, _)| symbol.as_str())
            .last()
    }

    /// All symbols with their bindings, in numeric order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        let mut pairs: Vec<(&str, Option<&str>)> = self
            .bindings
            .iter()
            .map(|(symbol, bound)| (symbol.as_str(), bound.as_deref()))
            .collect();
        pairs.sort_by(|a, b| symbol_order(a.0, b.0));
        pairs.into_iter()
    }

    /// Number of known symbols.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if the table has no symbols.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound keys as persisted records. Symbols that are not numbers are skipped.
    pub fn to_records(&self) -> Vec<QuickKeyRecord> {
        self.iter()
            .filter_map(|(symbol, bound)| {
                Some(QuickKeyRecord {
                    key: symbol.parse().ok()?,
                    layout_id: bound?.to_string(),
                })
            })
            .collect()
    }

    /// Replaces every binding with `records`, keeping the known symbols.
    ///
    /// Used for externally originated table updates. Records for unknown
    /// keys add the key. Identities are stored in canonical form. Returns
    /// the symbols whose binding changed.
    ///
    /// The whole table is rejected, leaving the current one untouched, if an
    /// identity does not parse, a key appears twice, or one layout is bound
    /// to more than one key.
    pub fn apply_records(&mut self, records: &[QuickKeyRecord]) -> LayoutResult<Vec<String>> {
        let mut incoming: BTreeMap<String, Option<String>> =
            self.bindings.keys().map(|symbol| (symbol.clone(), None)).collect();
        for (symbol, identity) in validate_records(records)? {
            incoming.insert(symbol, Some(identity));
        }

        let mut changed = Vec::new();
        for (symbol, bound) in incoming {
            let current = self.holder_of(&symbol).map(str::to_string);
            if current == bound && self.contains_key(&symbol) {
                continue;
            }
            match &bound {
                Some(identity) => {
                    self.select_key(&symbol, identity);
                }
                None => {
                    self.free_key(&symbol);
                }
            }
            changed.push(symbol);
        }
        sort_symbols(&mut changed);
        Ok(changed)
    }

    /// Subscribes to binding changes.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&QuickKeyEvent) + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Removes a binding-change subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}

/// Canonical `(symbol, identity)` pairs, or the first rule the table breaks.
fn validate_records(records: &[QuickKeyRecord]) -> LayoutResult<Vec<(String, String)>> {
    let mut keys = HashSet::new();
    let mut holders = HashSet::new();
    let mut pairs = Vec::with_capacity(records.len());
    for record in records {
        let identity = LayoutIdentity::parse(&record.layout_id)?.canonical();
        if !keys.insert(record.key) {
            return Err(LayoutError::InvalidValue {
                field: "quick key table",
                reason: format!("key {} is bound more than once", record.key),
            });
        }
        if !holders.insert(identity.clone()) {
            return Err(LayoutError::InvalidValue {
                field: "quick key table",
                reason: format!("layout {identity} is bound to more than one key"),
            });
        }
        pairs.push((record.key.to_string(), identity));
    }
    Ok(pairs)
}

/// Orders numeric symbols by value, then everything else lexically.
fn symbol_order(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

pub(crate) fn sort_symbols(symbols: &mut [String]) {
    symbols.sort_by(|a, b| symbol_order(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const A: &str = "{AAAAAAAA-0000-4000-8000-000000000000}";
    const B: &str = "{BBBBBBBB-0000-4000-8000-000000000000}";

    #[test]
    fn test_default_keys_all_free() {
        let keys = QuickKeyRegistry::with_default_keys();
        assert_eq!(keys.len(), 10);
        assert_eq!(keys.available_keys_for(A).len(), 10);
        assert!(keys.to_records().is_empty());
    }

    #[test]
    fn test_available_keys_include_own_binding() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        keys.select_key("2", A);

        let for_a = keys.available_keys_for(A);
        let for_b = keys.available_keys_for(B);
        assert!(for_a.contains(&"2".to_string()));
        assert!(!for_b.contains(&"2".to_string()));
        assert_eq!(for_a.len(), 10);
        assert_eq!(for_b.len(), 9);
    }

    #[test]
    fn test_select_key_overwrites_and_returns_previous() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        assert_eq!(keys.select_key("1", A), None);
        assert_eq!(keys.select_key("1", B), Some(A.to_string()));
        assert_eq!(keys.holder_of("1"), Some(B));
        assert_eq!(keys.key_for(A), None);
    }

    #[test]
    fn test_free_key_is_idempotent() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        keys.select_key("4", A);
        assert_eq!(keys.free_key("4"), Some(A.to_string()));
        assert_eq!(keys.free_key("4"), None);
        assert_eq!(keys.free_key("not-a-key"), None);
    }

    #[test]
    fn test_release_only_frees_own_key() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        keys.select_key("4", A);
        assert!(!keys.release("4", B));
        assert_eq!(keys.holder_of("4"), Some(A));
        assert!(keys.release("4", A));
        assert_eq!(keys.holder_of("4"), None);
    }

    #[test]
    fn test_events_fire_on_change_only() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut keys = QuickKeyRegistry::with_default_keys();
        let id = keys.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        keys.select_key("3", A);
        keys.select_key("3", A); // same binding, no event
        keys.free_key("3");
        keys.free_key("3"); // already free, no event

        assert_eq!(
            *events.borrow(),
            vec![
                QuickKeyEvent {
                    symbol: "3".to_string(),
                    previous: None,
                    current: Some(A.to_string()),
                },
                QuickKeyEvent {
                    symbol: "3".to_string(),
                    previous: Some(A.to_string()),
                    current: None,
                },
            ]
        );

        assert!(keys.unsubscribe(id));
        keys.select_key("5", B);
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_numeric_ordering() {
        let keys = QuickKeyRegistry::with_symbols(["10", "2", "1"]);
        let order: Vec<&str> = keys.iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec!["1", "2", "10"]);
    }

    #[test]
    fn test_apply_records_replaces_table() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        keys.select_key("1", A);
        keys.select_key("2", B);

        let changed = keys
            .apply_records(&[
                QuickKeyRecord {
                    key: 2,
                    layout_id: B.to_string(),
                },
                QuickKeyRecord {
                    key: 7,
                    layout_id: A.to_string(),
                },
            ])
            .unwrap();

        assert_eq!(changed, vec!["1".to_string(), "7".to_string()]);
        assert_eq!(keys.holder_of("1"), None);
        assert_eq!(keys.holder_of("2"), Some(B));
        assert_eq!(keys.key_for(A), Some("7"));
        assert_eq!(keys.len(), 10);
    }

    fn record(key: u8, layout_id: &str) -> QuickKeyRecord {
        QuickKeyRecord {
            key,
            layout_id: layout_id.to_string(),
        }
    }

    #[test]
    fn test_apply_records_canonicalizes_identities() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        keys.apply_records(&[record(4, &A.to_lowercase())]).unwrap();

        assert_eq!(keys.holder_of("4"), Some(A));
        assert_eq!(keys.key_for(A), Some("4"));

        let bare = A.trim_start_matches('{').trim_end_matches('}');
        keys.apply_records(&[record(5, bare)]).unwrap();
        assert_eq!(keys.key_for(A), Some("5"));
    }

    #[test]
    fn test_apply_records_rejects_layout_with_two_keys() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        keys.select_key("9", B);

        let err = keys
            .apply_records(&[record(1, A), record(2, &A.to_lowercase())])
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidValue { field: "quick key table", .. }));
        assert_eq!(keys.key_for(A), None);
        assert_eq!(keys.holder_of("9"), Some(B));
    }

    #[test]
    fn test_apply_records_rejects_repeated_key_and_bad_identity() {
        let mut keys = QuickKeyRegistry::with_default_keys();
        keys.select_key("3", A);

        assert!(keys.apply_records(&[record(3, B), record(3, A)]).is_err());
        assert!(matches!(
            keys.apply_records(&[record(5, "garbage")]).unwrap_err(),
            LayoutError::InvalidIdentity { .. }
        ));
        assert_eq!(keys.holder_of("3"), Some(A));
        assert_eq!(keys.holder_of("5"), None);
    }
}

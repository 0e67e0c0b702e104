//! Change notification plumbing.
//!
//! Every mutable entity (layout entries, the quick-key table, the settings
//! view) owns a [`ChangeNotifier`] that interested parties subscribe to.
//! Subscriptions are explicit: [`ChangeNotifier::subscribe`] hands back a
//! [`SubscriptionId`] that must be passed to [`ChangeNotifier::unsubscribe`]
//! when the observer goes away. Dropping the entity drops its subscribers.
//!
//! Callbacks run synchronously on the mutating thread, in subscription order,
//! after the mutation has been fully applied.

use std::fmt;

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback<E> = Box<dyn FnMut(&E)>;

/// Callback registry for change events of type `E`.
pub struct ChangeNotifier<E> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<E>)>,
}

impl<E> ChangeNotifier<E> {
    /// Creates a notifier with no subscribers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Registers a callback and returns its handle.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&E) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a callback. Returns false if the handle was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Delivers an event to every subscriber.
    pub fn notify(&mut self, event: &E) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Drops all subscriptions.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

impl<E> Default for ChangeNotifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for ChangeNotifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

//! Live settings snapshot bound to an outbound transport.

use crate::error::LayoutResult;
use crate::sync::envelope::{module_envelope, parse_module_envelope};
use crate::sync::transport::Transport;
use crate::sync::ModuleSettings;
use std::fmt;
use tracing::{debug, info, warn};

/// Holds the live copy of a settings aggregate and propagates it.
///
/// Every local change is sent as one envelope. Changes that arrive from the
/// other side go through [`SettingsSyncChannel::apply_inbound`] and are never
/// echoed back.
pub struct SettingsSyncChannel<S: ModuleSettings> {
    settings: S,
    transport: Box<dyn Transport>,
    applying_inbound: bool,
    messages_sent: usize,
}

impl<S: ModuleSettings> SettingsSyncChannel<S> {
    /// Creates a channel with an initial snapshot. Nothing is sent yet.
    pub fn new(settings: S, transport: impl Transport + 'static) -> Self {
        Self::with_boxed_transport(settings, Box::new(transport))
    }

    /// Creates a channel from an already boxed transport.
    pub fn with_boxed_transport(settings: S, transport: Box<dyn Transport>) -> Self {
        Self {
            settings,
            transport,
            applying_inbound: false,
            messages_sent: 0,
        }
    }

    /// The live snapshot.
    pub const fn settings(&self) -> &S {
        &self.settings
    }

    /// Serializes the live snapshot and hands it to the transport.
    ///
    /// Returns false when nothing was handed off: either an inbound update
    /// is being applied or the transport failed. Transport failures are
    /// logged and swallowed; serialization failures are returned.
    pub fn propagate(&mut self) -> LayoutResult<bool> {
        if self.applying_inbound {
            debug!(module = S::MODULE_NAME, "Suppressing propagation during inbound update");
            return Ok(false);
        }

        let message = module_envelope(&self.settings)?;
        match self.transport.send(&message) {
            Ok(()) => {
                self.messages_sent += 1;
                info!(module = S::MODULE_NAME, bytes = message.len(), "Propagated settings");
                Ok(true)
            }
            Err(e) => {
                warn!(module = S::MODULE_NAME, error = %e, "Failed to send settings update");
                Ok(false)
            }
        }
    }

    /// Mutates the live snapshot and propagates if `change` reports a change.
    pub fn update<F>(&mut self, change: F) -> LayoutResult<bool>
    where
        F: FnOnce(&mut S) -> bool,
    {
        if !change(&mut self.settings) {
            return Ok(false);
        }
        self.propagate()?;
        Ok(true)
    }

    /// Replaces the live snapshot and propagates when it differs.
    pub fn replace(&mut self, settings: S) -> LayoutResult<bool> {
        if self.settings == settings {
            return Ok(false);
        }
        self.settings = settings;
        self.propagate()?;
        Ok(true)
    }

    /// Adopts an externally originated snapshot without sending it back.
    ///
    /// Returns true if the snapshot changed.
    pub fn apply_inbound(&mut self, settings: S) -> bool {
        self.apply_inbound_with(settings, |_| {})
    }

    /// Like [`SettingsSyncChannel::apply_inbound`], then runs `react` with
    /// propagation suppressed so follow-up edits are not echoed.
    pub fn apply_inbound_with<F>(&mut self, settings: S, react: F) -> bool
    where
        F: FnOnce(&mut Self),
    {
        if self.settings == settings {
            return false;
        }
        debug!(module = S::MODULE_NAME, "Applying inbound settings");
        self.applying_inbound = true;
        self.settings = settings;
        react(self);
        self.applying_inbound = false;
        true
    }

    /// Parses a modules envelope and adopts the contained snapshot.
    pub fn apply_inbound_message(&mut self, message: &str) -> LayoutResult<bool> {
        let settings = parse_module_envelope::<S>(message)?;
        Ok(self.apply_inbound(settings))
    }

    /// True when `settings` equals the live snapshot.
    pub fn is_up_to_date(&self, settings: &S) -> bool {
        self.settings == *settings
    }

    /// True while an inbound update is being applied.
    pub const fn is_applying_inbound(&self) -> bool {
        self.applying_inbound
    }

    /// Number of messages handed to the transport so far.
    pub const fn messages_sent(&self) -> usize {
        self.messages_sent
    }
}

impl<S: ModuleSettings> fmt::Debug for SettingsSyncChannel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsSyncChannel")
            .field("module", &S::MODULE_NAME)
            .field("settings", &self.settings)
            .field("messages_sent", &self.messages_sent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde::{Deserialize, Serialize};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
    }

    impl ModuleSettings for Counter {
        const MODULE_NAME: &'static str = "Counter";
    }

    fn recording_channel() -> (SettingsSyncChannel<Counter>, Rc<RefCell<Vec<String>>>) {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&sent);
        let channel = SettingsSyncChannel::new(Counter::default(), move |m: &str| -> anyhow::Result<()> {
            sink.borrow_mut().push(m.to_string());
            Ok(())
        });
        (channel, sent)
    }

    #[test]
    fn test_update_sends_one_envelope_per_change() {
        let (mut channel, sent) = recording_channel();

        assert!(channel
            .update(|s| {
                s.value = 1;
                true
            })
            .unwrap());
        assert!(!channel.update(|_| false).unwrap());

        assert_eq!(*sent.borrow(), vec![r#"{"powertoys":{"Counter":{"value":1}}}"#.to_string()]);
        assert_eq!(channel.messages_sent(), 1);
    }

    #[test]
    fn test_replace_skips_equal_snapshot() {
        let (mut channel, sent) = recording_channel();
        assert!(!channel.replace(Counter::default()).unwrap());
        assert!(channel.replace(Counter { value: 2 }).unwrap());
        assert!(!channel.replace(Counter { value: 2 }).unwrap());
        assert_eq!(sent.borrow().len(), 1);
    }

    #[test]
    fn test_inbound_is_not_echoed() {
        let (mut channel, sent) = recording_channel();

        assert!(channel.apply_inbound(Counter { value: 5 }));
        assert!(channel.is_up_to_date(&Counter { value: 5 }));
        assert!(sent.borrow().is_empty());

        // Edits made while reacting to inbound data are suppressed too
        channel.apply_inbound_with(Counter { value: 6 }, |c| {
            assert!(c.is_applying_inbound());
            assert!(!c.propagate().unwrap());
        });
        assert!(!channel.is_applying_inbound());
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn test_apply_inbound_message() {
        let (mut channel, sent) = recording_channel();
        assert!(channel
            .apply_inbound_message(r#"{"powertoys":{"Counter":{"value":8}}}"#)
            .unwrap());
        assert_eq!(channel.settings().value, 8);
        assert!(channel.apply_inbound_message("{}").is_err());
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn test_transport_failure_is_swallowed() {
        let mut channel = SettingsSyncChannel::new(Counter::default(), |_: &str| -> anyhow::Result<()> {
            Err(anyhow!("pipe closed"))
        });
        assert!(channel.replace(Counter { value: 1 }).unwrap());
        assert_eq!(channel.settings().value, 1);
        assert_eq!(channel.messages_sent(), 0);
    }
}

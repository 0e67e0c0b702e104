//! Outbound settings propagation.
//!
//! Settings aggregates are wrapped in a JSON envelope and handed to a
//! [`Transport`]. The receiving process is external; delivery is
//! fire-and-forget.

pub mod channel;
pub mod envelope;
pub mod transport;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

pub use channel::SettingsSyncChannel;
pub use envelope::{general_envelope, module_envelope, parse_module_envelope};
pub use transport::{ChannelTransport, Transport};

#[cfg(unix)]
pub use transport::UnixSocketTransport;

/// A settings aggregate that can be propagated under a module name.
pub trait ModuleSettings: Serialize + DeserializeOwned + Clone + PartialEq + Debug {
    /// Key under which the aggregate appears in the envelope.
    const MODULE_NAME: &'static str;
}

//! Service layer for business logic.
//!
//! This module contains the stateful collections (layout registry, quick-key
//! table), the session that coordinates them, and file persistence.

pub mod layouts;
pub mod quick_keys;
pub mod registry;
pub mod session;

// Re-export commonly used types
pub use layouts::LayoutStore;
pub use quick_keys::{QuickKeyEvent, QuickKeyRecord, QuickKeyRegistry};
pub use registry::LayoutRegistry;
pub use session::LayoutSession;

//! Settings front-end for the zones module.

pub mod general;
pub mod module;
pub mod view;

pub use general::{GeneralSettings, JsonFileRepository, MemorySettingsRepository, SettingsRepository};
pub use module::{EditorPosition, HotkeySettings, PluginSettings, Theme, ZoneModuleSettings, ZoneProperties};
pub use view::{SettingsProperty, ZoneSettingsView, ZoneSettingsViewBuilder};

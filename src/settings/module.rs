//! Zones module settings as propagated to the tiler.

use crate::sync::ModuleSettings;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Editor colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    /// Always dark
    Dark,
    /// Always light
    Light,
    /// Follow the OS setting
    #[default]
    System,
}

impl Theme {
    /// Picker order.
    pub const ALL: [Self; 3] = [Self::Dark, Self::Light, Self::System];

    /// Position in the picker.
    pub const fn index(self) -> usize {
        match self {
            Self::Dark => 0,
            Self::Light => 1,
            Self::System => 2,
        }
    }

    /// Theme at picker position `index`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Where the layout editor opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EditorPosition {
    /// Monitor under the mouse cursor
    #[default]
    Cursor,
    /// Primary monitor
    PrimaryMonitor,
    /// Monitor of the focused window
    Focus,
}

impl EditorPosition {
    /// Picker order.
    pub const ALL: [Self; 3] = [Self::Cursor, Self::PrimaryMonitor, Self::Focus];

    /// Position in the picker.
    pub const fn index(self) -> usize {
        match self {
            Self::Cursor => 0,
            Self::PrimaryMonitor => 1,
            Self::Focus => 2,
        }
    }

    /// Editor position at picker position `index`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Global hotkey chord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeySettings {
    /// Windows/Super modifier
    pub win: bool,
    /// Control modifier
    pub ctrl: bool,
    /// Alt modifier
    pub alt: bool,
    /// Shift modifier
    pub shift: bool,
    /// Virtual key code
    pub code: u32,
    /// Display label of the key
    pub key: String,
}

impl HotkeySettings {
    /// True when no key is set.
    pub fn is_empty(&self) -> bool {
        self.code == 0 && self.key.is_empty()
    }
}

impl Default for HotkeySettings {
    fn default() -> Self {
        // Win + Shift + `
        Self {
            win: true,
            ctrl: false,
            alt: false,
            shift: true,
            code: 192,
            key: "`".to_string(),
        }
    }
}

impl fmt::Display for HotkeySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = [
            (self.win, "Win"),
            (self.ctrl, "Ctrl"),
            (self.alt, "Alt"),
            (self.shift, "Shift"),
        ];
        let mut parts: Vec<&str> = modifiers
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, label)| *label)
            .collect();
        if !self.key.is_empty() {
            parts.push(&self.key);
        }
        f.write_str(&parts.join(" + "))
    }
}

/// User-editable zones properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneProperties {
    /// Switch layouts with the quick keys
    pub quick_layout_switch: bool,
    /// Flash the zones after a quick switch
    pub flash_zones_on_quick_switch: bool,
    /// Show zones on every monitor while dragging
    pub show_on_all_monitors: bool,
    /// Hotkey that opens the layout editor
    pub editor_hotkey: HotkeySettings,
    /// Zone highlight opacity in percent
    pub zone_highlight_opacity: u8,
    /// Editor theme
    pub theme: Theme,
    /// Where the editor opens
    pub editor_position: EditorPosition,
}

impl Default for ZoneProperties {
    fn default() -> Self {
        Self {
            quick_layout_switch: true,
            flash_zones_on_quick_switch: true,
            show_on_all_monitors: false,
            editor_hotkey: HotkeySettings::default(),
            zone_highlight_opacity: 50,
            theme: Theme::default(),
            editor_position: EditorPosition::default(),
        }
    }
}

/// Per-plugin settings of a zones add-on (snapping helpers, layout
/// providers). The tiler reports the plugin list; the page edits it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Stable plugin id
    pub id: String,
    /// Display name
    pub name: String,
    /// Plugin is switched off
    pub disabled: bool,
    /// Plugin runs without its activation keyword
    pub is_global: bool,
    /// Keyword that activates the plugin
    pub action_keyword: String,
}

impl PluginSettings {
    /// An enabled, non-global plugin without a keyword.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// The zones module settings object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneModuleSettings {
    /// Module name, always `Zones`
    pub name: String,
    /// Settings schema version
    pub version: String,
    /// Editable properties
    pub properties: ZoneProperties,
    /// Add-on plugins in display order
    #[serde(default)]
    pub plugins: Vec<PluginSettings>,
}

impl ZoneModuleSettings {
    /// Plugin with the given id.
    pub fn plugin(&self, id: &str) -> Option<&PluginSettings> {
        self.plugins.iter().find(|p| p.id == id)
    }

    /// Plugin with the given id, for mutation.
    pub fn plugin_mut(&mut self, id: &str) -> Option<&mut PluginSettings> {
        self.plugins.iter_mut().find(|p| p.id == id)
    }

    /// True when at least one plugin exists and every plugin is disabled.
    pub fn all_plugins_disabled(&self) -> bool {
        !self.plugins.is_empty() && self.plugins.iter().all(|p| p.disabled)
    }
}

impl Default for ZoneModuleSettings {
    fn default() -> Self {
        Self {
            name: Self::MODULE_NAME.to_string(),
            version: "1.0".to_string(),
            properties: ZoneProperties::default(),
            plugins: Vec::new(),
        }
    }
}

impl ModuleSettings for ZoneModuleSettings {
    const MODULE_NAME: &'static str = "Zones";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_mapping() {
        for (i, theme) in Theme::ALL.into_iter().enumerate() {
            assert_eq!(theme.index(), i);
            assert_eq!(Theme::from_index(i), Some(theme));
        }
        assert_eq!(Theme::from_index(3), None);
        assert_eq!(EditorPosition::from_index(1), Some(EditorPosition::PrimaryMonitor));
        assert_eq!(EditorPosition::Focus.index(), 2);
        assert_eq!(EditorPosition::from_index(7), None);
    }

    #[test]
    fn test_hotkey_display() {
        assert_eq!(HotkeySettings::default().to_string(), "Win + Shift + `");
        let empty = HotkeySettings {
            win: false,
            ctrl: false,
            alt: false,
            shift: false,
            code: 0,
            key: String::new(),
        };
        assert!(empty.is_empty());
        assert_eq!(empty.to_string(), "");
    }

    #[test]
    fn test_partial_properties_use_defaults() {
        let props: ZoneProperties = serde_json::from_str(r#"{"show_on_all_monitors": true}"#).unwrap();
        assert!(props.show_on_all_monitors);
        assert!(props.quick_layout_switch);
        assert_eq!(props.zone_highlight_opacity, 50);
    }

    #[test]
    fn test_all_plugins_disabled() {
        let mut settings = ZoneModuleSettings::default();
        assert!(!settings.all_plugins_disabled());

        settings.plugins = vec![PluginSettings::new("snap", "Snap"), PluginSettings::new("grid", "Grid")];
        assert!(!settings.all_plugins_disabled());

        settings.plugin_mut("snap").unwrap().disabled = true;
        assert!(!settings.all_plugins_disabled());
        settings.plugin_mut("grid").unwrap().disabled = true;
        assert!(settings.all_plugins_disabled());
        assert!(settings.plugin("missing").is_none());
    }

    #[test]
    fn test_settings_without_plugins_parse() {
        let settings: ZoneModuleSettings =
            serde_json::from_str(r#"{"name":"Zones","version":"1.0","properties":{}}"#).unwrap();
        assert!(settings.plugins.is_empty());
    }
}

//! Settings-page state for the zones module.
//!
//! The view holds the live [`ZoneModuleSettings`], the general settings
//! repository and the outbound transport. Every effective change is sent to
//! the tiler right away and announced to subscribers.

use crate::error::{LayoutError, LayoutResult};
use crate::notify::{ChangeNotifier, SubscriptionId};
use crate::settings::general::{GeneralSettings, SettingsRepository};
use crate::settings::module::{
    EditorPosition, HotkeySettings, PluginSettings, Theme, ZoneModuleSettings, ZoneProperties,
};
use crate::sync::{general_envelope, ModuleSettings, SettingsSyncChannel, Transport};
use anyhow::Result;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// Observable properties of a [`ZoneSettingsView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsProperty {
    /// Module enabled flag
    Enabled,
    /// Quick layout switch toggle
    QuickLayoutSwitch,
    /// Flash-on-switch toggle
    FlashZonesOnQuickSwitch,
    /// Derived: whether the flash toggle can be edited
    IsFlashOnQuickSwitchEditable,
    /// Show-on-all-monitors toggle
    ShowOnAllMonitors,
    /// Editor hotkey
    EditorHotkey,
    /// Highlight opacity
    ZoneHighlightOpacity,
    /// Theme picker index
    ThemeIndex,
    /// Editor position picker index
    EditorPositionIndex,
    /// A plugin's settings changed
    Plugins,
    /// Derived: every plugin is disabled while the module is on
    ShowAllPluginsDisabledWarning,
    /// Derived: the module is on but no plugins are known yet
    ShowPluginsLoadingMessage,
    /// Whole settings object replaced by an inbound update
    Reloaded,
}

type SharedTransport = Rc<RefCell<Box<dyn Transport>>>;

/// Builder for [`ZoneSettingsView`]. All three collaborators are required.
#[derive(Default)]
pub struct ZoneSettingsViewBuilder {
    settings: Option<ZoneModuleSettings>,
    repository: Option<Box<dyn SettingsRepository<GeneralSettings>>>,
    transport: Option<Box<dyn Transport>>,
}

impl ZoneSettingsViewBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial module settings.
    #[must_use]
    pub fn settings(mut self, settings: ZoneModuleSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// General settings repository.
    #[must_use]
    pub fn repository(mut self, repository: impl SettingsRepository<GeneralSettings> + 'static) -> Self {
        self.repository = Some(Box::new(repository));
        self
    }

    /// Outbound transport for both module and general messages.
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Builds the view.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MissingCollaborator`] naming the first missing
    /// collaborator.
    pub fn build(self) -> LayoutResult<ZoneSettingsView> {
        let settings = self
            .settings
            .ok_or(LayoutError::MissingCollaborator("zone settings"))?;
        let repository = self
            .repository
            .ok_or(LayoutError::MissingCollaborator("settings repository"))?;
        let transport = self
            .transport
            .ok_or(LayoutError::MissingCollaborator("transport"))?;

        // Module and general messages share one transport
        let transport: SharedTransport = Rc::new(RefCell::new(transport));
        let module_transport = Rc::clone(&transport);
        let channel = SettingsSyncChannel::new(settings, move |message: &str| -> Result<()> {
            module_transport.borrow_mut().send(message)
        });

        Ok(ZoneSettingsView {
            channel,
            repository,
            transport,
            notifier: ChangeNotifier::new(),
        })
    }
}

impl fmt::Debug for ZoneSettingsViewBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneSettingsViewBuilder")
            .field("settings", &self.settings)
            .field("repository", &self.repository.is_some())
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

/// Settings-page state for the zones module.
pub struct ZoneSettingsView {
    channel: SettingsSyncChannel<ZoneModuleSettings>,
    repository: Box<dyn SettingsRepository<GeneralSettings>>,
    transport: SharedTransport,
    notifier: ChangeNotifier<SettingsProperty>,
}

impl ZoneSettingsView {
    /// Starts building a view.
    #[must_use]
    pub fn builder() -> ZoneSettingsViewBuilder {
        ZoneSettingsViewBuilder::new()
    }

    // === Getters ===

    /// The live module settings.
    pub const fn settings(&self) -> &ZoneModuleSettings {
        self.channel.settings()
    }

    fn properties(&self) -> &ZoneProperties {
        &self.channel.settings().properties
    }

    /// The general settings held by the repository.
    pub fn general(&self) -> &GeneralSettings {
        self.repository.settings()
    }

    /// Whether the zones module is enabled.
    pub fn is_enabled(&self) -> bool {
        self.general().is_enabled(ZoneModuleSettings::MODULE_NAME)
    }

    /// Quick layout switch toggle.
    pub fn quick_layout_switch(&self) -> bool {
        self.properties().quick_layout_switch
    }

    /// Flash-on-switch toggle.
    pub fn flash_zones_on_quick_switch(&self) -> bool {
        self.properties().flash_zones_on_quick_switch
    }

    /// The flash toggle only matters while the module is on and quick
    /// switching is enabled.
    pub fn is_flash_on_quick_switch_editable(&self) -> bool {
        self.is_enabled() && self.quick_layout_switch()
    }

    /// Show-on-all-monitors toggle.
    pub fn show_on_all_monitors(&self) -> bool {
        self.properties().show_on_all_monitors
    }

    /// Editor hotkey.
    pub fn editor_hotkey(&self) -> &HotkeySettings {
        &self.properties().editor_hotkey
    }

    /// Highlight opacity in percent.
    pub fn zone_highlight_opacity(&self) -> u8 {
        self.properties().zone_highlight_opacity
    }

    /// Theme picker index.
    pub fn theme_index(&self) -> usize {
        self.properties().theme.index()
    }

    /// Editor position picker index.
    pub fn editor_position_index(&self) -> usize {
        self.properties().editor_position.index()
    }

    /// Add-on plugins in display order.
    pub fn plugins(&self) -> &[PluginSettings] {
        &self.channel.settings().plugins
    }

    /// Warn that the module is on but every plugin is switched off.
    pub fn show_all_plugins_disabled_warning(&self) -> bool {
        self.is_enabled() && self.channel.settings().all_plugins_disabled()
    }

    /// The module is on and the tiler has not reported any plugins yet.
    pub fn show_plugins_loading_message(&self) -> bool {
        self.is_enabled() && self.plugins().is_empty()
    }

    /// True when `settings` equals the live settings.
    pub fn is_up_to_date(&self, settings: &ZoneModuleSettings) -> bool {
        self.channel.is_up_to_date(settings)
    }

    // === Observation ===

    /// Subscribes to property changes.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&SettingsProperty) + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Removes a property-change subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // === Setters ===

    /// Enables or disables the zones module.
    ///
    /// Updates and saves the general settings, then sends the general
    /// envelope. If saving fails the previous settings are restored and
    /// nothing is announced.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<bool> {
        let previous = self.repository.settings().clone();
        if !self
            .repository
            .settings_mut()
            .set_enabled(ZoneModuleSettings::MODULE_NAME, enabled)
        {
            return Ok(false);
        }

        if let Err(e) = self.repository.save() {
            *self.repository.settings_mut() = previous;
            return Err(e.context("Failed to save general settings"));
        }

        debug!(enabled, "Zones module toggled");
        self.notifier.notify(&SettingsProperty::Enabled);
        self.notifier.notify(&SettingsProperty::IsFlashOnQuickSwitchEditable);
        self.notifier.notify(&SettingsProperty::ShowAllPluginsDisabledWarning);
        self.notifier.notify(&SettingsProperty::ShowPluginsLoadingMessage);

        let message = general_envelope(self.repository.settings())?;
        if let Err(e) = self.transport.borrow_mut().send(&message) {
            warn!(error = %e, "Failed to send general settings update");
        }
        Ok(true)
    }

    /// Quick layout switch toggle.
    pub fn set_quick_layout_switch(&mut self, value: bool) -> LayoutResult<bool> {
        let changed = self.update(SettingsProperty::QuickLayoutSwitch, |p| {
            replace(&mut p.quick_layout_switch, value)
        })?;
        if changed {
            self.notifier.notify(&SettingsProperty::IsFlashOnQuickSwitchEditable);
        }
        Ok(changed)
    }

    /// Flash-on-switch toggle.
    pub fn set_flash_zones_on_quick_switch(&mut self, value: bool) -> LayoutResult<bool> {
        self.update(SettingsProperty::FlashZonesOnQuickSwitch, |p| {
            replace(&mut p.flash_zones_on_quick_switch, value)
        })
    }

    /// Show-on-all-monitors toggle.
    pub fn set_show_on_all_monitors(&mut self, value: bool) -> LayoutResult<bool> {
        self.update(SettingsProperty::ShowOnAllMonitors, |p| {
            replace(&mut p.show_on_all_monitors, value)
        })
    }

    /// Editor hotkey.
    pub fn set_editor_hotkey(&mut self, hotkey: HotkeySettings) -> LayoutResult<bool> {
        self.update(SettingsProperty::EditorHotkey, |p| {
            replace(&mut p.editor_hotkey, hotkey)
        })
    }

    /// Highlight opacity, 0-100.
    pub fn set_zone_highlight_opacity(&mut self, percent: u8) -> LayoutResult<bool> {
        if percent > 100 {
            return Err(LayoutError::InvalidValue {
                field: "zone highlight opacity",
                reason: format!("{percent} is not a percentage"),
            });
        }
        self.update(SettingsProperty::ZoneHighlightOpacity, |p| {
            replace(&mut p.zone_highlight_opacity, percent)
        })
    }

    /// Selects the theme by picker index (0 Dark, 1 Light, 2 System).
    pub fn set_theme_index(&mut self, index: usize) -> LayoutResult<bool> {
        let theme = Theme::from_index(index).ok_or(LayoutError::InvalidIndex {
            field: "theme",
            index,
            max: Theme::ALL.len() - 1,
        })?;
        self.update(SettingsProperty::ThemeIndex, |p| replace(&mut p.theme, theme))
    }

    /// Selects the editor position by picker index (0 Cursor,
    /// 1 PrimaryMonitor, 2 Focus).
    pub fn set_editor_position_index(&mut self, index: usize) -> LayoutResult<bool> {
        let position = EditorPosition::from_index(index).ok_or(LayoutError::InvalidIndex {
            field: "editor position",
            index,
            max: EditorPosition::ALL.len() - 1,
        })?;
        self.update(SettingsProperty::EditorPositionIndex, |p| {
            replace(&mut p.editor_position, position)
        })
    }

    /// Switches a plugin on or off.
    pub fn set_plugin_disabled(&mut self, id: &str, disabled: bool) -> LayoutResult<bool> {
        self.update_plugin(id, |p| replace(&mut p.disabled, disabled))
    }

    /// Makes a plugin run without its keyword.
    pub fn set_plugin_global(&mut self, id: &str, is_global: bool) -> LayoutResult<bool> {
        self.update_plugin(id, |p| replace(&mut p.is_global, is_global))
    }

    /// Changes a plugin's activation keyword.
    pub fn set_plugin_action_keyword(&mut self, id: &str, keyword: &str) -> LayoutResult<bool> {
        let keyword = keyword.trim().to_string();
        self.update_plugin(id, |p| replace(&mut p.action_keyword, keyword))
    }

    /// Adopts settings sent by the tiler without echoing them back.
    pub fn apply_inbound(&mut self, settings: ZoneModuleSettings) -> bool {
        let changed = self.channel.apply_inbound(settings);
        if changed {
            self.notifier.notify(&SettingsProperty::Reloaded);
        }
        changed
    }

    fn update_plugin<F>(&mut self, id: &str, change: F) -> LayoutResult<bool>
    where
        F: FnOnce(&mut PluginSettings) -> bool,
    {
        if self.channel.settings().plugin(id).is_none() {
            return Err(LayoutError::InvalidValue {
                field: "plugin",
                reason: format!("no plugin with id '{id}'"),
            });
        }

        let changed = self
            .channel
            .update(|s| s.plugin_mut(id).is_some_and(change))?;
        if changed {
            debug!(plugin = id, "Plugin setting changed");
            self.notifier.notify(&SettingsProperty::Plugins);
            self.notifier.notify(&SettingsProperty::ShowAllPluginsDisabledWarning);
        }
        Ok(changed)
    }

    fn update<F>(&mut self, property: SettingsProperty, change: F) -> LayoutResult<bool>
    where
        F: FnOnce(&mut ZoneProperties) -> bool,
    {
        let changed = self.channel.update(|s| change(&mut s.properties))?;
        if changed {
            debug!(?property, "Zones setting changed");
            self.notifier.notify(&property);
        }
        Ok(changed)
    }
}

impl fmt::Debug for ZoneSettingsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneSettingsView")
            .field("channel", &self.channel)
            .field("general", self.repository.settings())
            .finish_non_exhaustive()
    }
}

/// Stores `value` in `slot`; true if it differed.
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

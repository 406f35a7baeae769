// ABOUTME: In-memory preview settings store with change notification and TOML loading
// ABOUTME: Subscribers hear only about values that actually changed

use glance_events::settings::Event as SettingsEvent;
use glance_events::{SettingsListener, SubscriptionId};
use glance_logging::{debug, info, trace};
use glance_types::{BehaviorMode, PreviewConfig, SettingKey};
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::capabilities::SettingsStore;
use crate::error::{PreviewError, Result};

/// File name looked up by [`PreviewSettings::load_from_dir`]
pub const SETTINGS_FILE_NAME: &str = "glance.toml";

/// Settings store backed by a [`PreviewConfig`]
pub struct PreviewSettings {
    config: RwLock<PreviewConfig>,
    listeners: Mutex<Vec<(SubscriptionId, SettingsListener)>>,
    next_subscription: AtomicU64,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self::new(PreviewConfig::default())
    }
}

impl PreviewSettings {
    pub fn new(config: PreviewConfig) -> Self {
        Self {
            config: RwLock::new(config),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: PreviewConfig = toml::from_str(content)?;
        Ok(Self::new(config))
    }

    /// Load `glance.toml` from `dir`, falling back to defaults when it does not exist
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(SETTINGS_FILE_NAME);
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| PreviewError::SettingsIo {
            path: path.clone(),
            source,
        })?;
        let settings = Self::from_toml_str(&content)
            .map_err(|source| PreviewError::SettingsParse { path: path.clone(), source })?;

        info!(path = %path.display(), "Loaded preview settings");
        Ok(settings)
    }

    /// Apply `change` and notify subscribers about every key whose value differs
    pub fn update(&self, change: impl FnOnce(&mut PreviewConfig)) {
        let events: Vec<SettingsEvent> = {
            let mut config = self.config.write();
            let before = config.clone();
            change(&mut config);

            SettingKey::ALL
                .iter()
                .filter_map(|&key| {
                    let old_value = before.value(key);
                    let new_value = config.value(key);
                    (old_value != new_value).then_some(SettingsEvent::Changed {
                        key,
                        old_value: Some(old_value),
                        new_value,
                    })
                })
                .collect()
        };

        if events.is_empty() {
            trace!("Settings update changed nothing");
            return;
        }

        let listeners: Vec<SettingsListener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for event in &events {
            debug!(key = event.key().name(), value = ?event.new_value(), "Setting changed");
            for listener in &listeners {
                listener(event);
            }
        }
    }

    pub fn set_behavior_mode(&self, mode: BehaviorMode) {
        self.set_preview_behavior(mode.as_str());
    }

    /// Store a raw behavior value; unknown values are only rejected when a decision reads them
    pub fn set_preview_behavior(&self, value: &str) {
        let value = value.to_string();
        self.update(move |config| config.preview_behavior = value);
    }

    pub fn set_preview_closed_on_tab_change(&self, enabled: bool) {
        self.update(|config| config.preview_closed_on_tab_change = enabled);
    }

    pub fn set_open_editor_on_edit_preview(&self, enabled: bool) {
        self.update(|config| config.open_editor_on_edit_preview = enabled);
    }

    pub fn set_tree_focus_support(&self, enabled: bool) {
        self.update(|config| config.tree_focus_support = enabled);
    }

    pub fn set_tree_toggle_one_click(&self, enabled: bool) {
        self.update(|config| config.tree_toggle_one_click = enabled);
    }
}

impl SettingsStore for PreviewSettings {
    fn snapshot(&self) -> PreviewConfig {
        self.config.read().clone()
    }

    fn subscribe(&self, listener: SettingsListener) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.lock().retain(|(existing, _)| *existing != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_types::{SettingValue, ToggleClickCount};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn recording(settings: &PreviewSettings) -> (SubscriptionId, Arc<Mutex<Vec<SettingsEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = settings.subscribe(Arc::new(move |event: &SettingsEvent| {
            sink.lock().push(event.clone())
        }));
        (id, seen)
    }

    #[test]
    fn test_notifies_only_on_change() {
        let settings = PreviewSettings::default();
        let (_id, seen) = recording(&settings);

        settings.set_tree_toggle_one_click(false);
        assert!(seen.lock().is_empty());

        settings.set_tree_toggle_one_click(true);
        let events = seen.lock().clone();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key(), SettingKey::TreeToggleOneClick);
        assert_eq!(events[0].new_value(), &SettingValue::Bool(true));
        assert_eq!(settings.toggle_click_count(), ToggleClickCount::One);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let settings = PreviewSettings::default();
        let (id, seen) = recording(&settings);
        settings.unsubscribe(id);

        settings.set_tree_focus_support(true);
        assert!(seen.lock().is_empty());
        assert!(settings.tree_focus_support());
    }

    #[test]
    fn test_listener_may_read_settings() {
        let settings = Arc::new(PreviewSettings::default());
        let observed = Arc::new(Mutex::new(None));

        let store = settings.clone();
        let slot = observed.clone();
        settings.subscribe(Arc::new(move |_event: &SettingsEvent| {
            *slot.lock() = Some(store.preview_closed_on_tab_change());
        }));

        settings.set_preview_closed_on_tab_change(true);
        assert_eq!(*observed.lock(), Some(true));
    }

    #[test]
    fn test_unknown_mode_is_kept_raw() {
        let settings = PreviewSettings::default();
        settings.set_preview_behavior("sometimes");

        assert_eq!(settings.snapshot().preview_behavior, "sometimes");
        assert!(settings.behavior_mode().is_err());

        settings.set_behavior_mode(BehaviorMode::ExplicitPreview);
        assert_eq!(settings.behavior_mode(), Ok(BehaviorMode::ExplicitPreview));
    }

    #[test]
    fn test_load_from_dir() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(SETTINGS_FILE_NAME),
            r#"
preview_behavior = "explicit-preview"
tree_toggle_one_click = true
"#,
        )
        .unwrap();

        let settings = PreviewSettings::load_from_dir(temp_dir.path()).unwrap();
        assert_eq!(settings.behavior_mode(), Ok(BehaviorMode::ExplicitPreview));
        assert_eq!(settings.toggle_click_count(), ToggleClickCount::One);
        // Missing keys fall back to their serde defaults
        assert!(settings.open_editor_on_edit_preview());
        assert!(!settings.preview_closed_on_tab_change());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = tempdir().unwrap();
        let settings = PreviewSettings::load_from_dir(temp_dir.path()).unwrap();
        assert_eq!(settings.snapshot(), PreviewConfig::default());
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(SETTINGS_FILE_NAME),
            "tree_focus_support = \"yes please\"",
        )
        .unwrap();

        let error = PreviewSettings::load_from_dir(temp_dir.path())
            .err()
            .expect("malformed settings must fail");
        assert!(matches!(error, PreviewError::SettingsParse { .. }));
        assert!(error.is_configuration());
    }
}

// ABOUTME: Settings change notifications tagged with the property that changed
// ABOUTME: Carries both the old and new value so observers can skip no-op updates

use glance_types::{SettingKey, SettingValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Changed {
        key: SettingKey,
        old_value: Option<SettingValue>,
        new_value: SettingValue,
    },
}

impl Event {
    /// Change notification without a known previous value
    pub fn changed(key: SettingKey, new_value: SettingValue) -> Self {
        Self::Changed {
            key,
            old_value: None,
            new_value,
        }
    }

    pub fn key(&self) -> SettingKey {
        match self {
            Self::Changed { key, .. } => *key,
        }
    }

    pub fn new_value(&self) -> &SettingValue {
        match self {
            Self::Changed { new_value, .. } => new_value,
        }
    }
}

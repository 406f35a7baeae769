// ABOUTME: Preview behavior configuration data types
// ABOUTME: Pure data structures for the settings snapshot consulted on every decision

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::input::ToggleClickCount;

/// Whether selecting a tree node opens a preview on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BehaviorMode {
    /// Selecting a file in the tree opens (or reuses) a preview tab
    PreviewByDefault,
    /// Selection only focuses already open tabs; previews need an explicit request
    ExplicitPreview,
}

impl BehaviorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreviewByDefault => "preview-by-default",
            Self::ExplicitPreview => "explicit-preview",
        }
    }
}

impl fmt::Display for BehaviorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured behavior mode value that no branch handles
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("behavior mode '{0}' is not handled")]
pub struct UnknownBehaviorMode(pub String);

impl FromStr for BehaviorMode {
    type Err = UnknownBehaviorMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "preview-by-default" | "PREVIEW_BY_DEFAULT" => Ok(Self::PreviewByDefault),
            "explicit-preview" | "EXPLICIT_PREVIEW" => Ok(Self::ExplicitPreview),
            other => Err(UnknownBehaviorMode(other.to_string())),
        }
    }
}

/// Settings snapshot for the preview lifecycle.
///
/// `preview_behavior` keeps the raw configured string. It is parsed where a
/// decision needs it so that a bad value fails that decision instead of
/// quietly turning into some default mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_preview_behavior")]
    pub preview_behavior: String,

    /// Close previews whenever the active editor tab changes
    #[serde(default)]
    pub preview_closed_on_tab_change: bool,

    /// Promote a preview to a permanent tab as soon as its content is edited
    #[serde(default = "default_true")]
    pub open_editor_on_edit_preview: bool,

    /// Move focus back to the navigation tree after files open or close
    #[serde(default)]
    pub tree_focus_support: bool,

    /// Expand/collapse tree nodes with a single click
    #[serde(default)]
    pub tree_toggle_one_click: bool,
}

fn default_preview_behavior() -> String {
    BehaviorMode::PreviewByDefault.as_str().to_string()
}

fn default_true() -> bool {
    true
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            preview_behavior: default_preview_behavior(),
            preview_closed_on_tab_change: false,
            open_editor_on_edit_preview: true,
            tree_focus_support: false,
            tree_toggle_one_click: false,
        }
    }
}

impl PreviewConfig {
    pub fn behavior_mode(&self) -> Result<BehaviorMode, UnknownBehaviorMode> {
        self.preview_behavior.parse()
    }

    pub fn toggle_click_count(&self) -> ToggleClickCount {
        ToggleClickCount::from_one_click(self.tree_toggle_one_click)
    }

    pub fn value(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::PreviewBehavior => SettingValue::Text(self.preview_behavior.clone()),
            SettingKey::PreviewClosedOnTabChange => {
                SettingValue::Bool(self.preview_closed_on_tab_change)
            }
            SettingKey::OpenEditorOnEditPreview => {
                SettingValue::Bool(self.open_editor_on_edit_preview)
            }
            SettingKey::TreeFocusSupport => SettingValue::Bool(self.tree_focus_support),
            SettingKey::TreeToggleOneClick => SettingValue::Bool(self.tree_toggle_one_click),
        }
    }
}

/// Property name attached to settings change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingKey {
    PreviewBehavior,
    PreviewClosedOnTabChange,
    OpenEditorOnEditPreview,
    TreeFocusSupport,
    TreeToggleOneClick,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::PreviewBehavior,
        SettingKey::PreviewClosedOnTabChange,
        SettingKey::OpenEditorOnEditPreview,
        SettingKey::TreeFocusSupport,
        SettingKey::TreeToggleOneClick,
    ];

    /// Stable property name used by hosts that bind settings by string
    pub fn name(self) -> &'static str {
        match self {
            Self::PreviewBehavior => "PreviewBehavior",
            Self::PreviewClosedOnTabChange => "PreviewClosedOnTabChange",
            Self::OpenEditorOnEditPreview => "OpenEditorOnEditPreview",
            Self::TreeFocusSupport => "ProjectViewFocusSupport",
            Self::TreeToggleOneClick => "ProjectViewToggleOneClick",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// New value carried by a settings change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingValue {
    Bool(bool),
    Text(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PreviewConfig::default();
        assert_eq!(config.behavior_mode(), Ok(BehaviorMode::PreviewByDefault));
        assert!(!config.preview_closed_on_tab_change);
        assert!(config.open_editor_on_edit_preview);
        assert!(!config.tree_focus_support);
        assert_eq!(config.toggle_click_count(), ToggleClickCount::Two);
    }

    #[test]
    fn test_behavior_mode_parsing() {
        assert_eq!(
            "explicit-preview".parse::<BehaviorMode>(),
            Ok(BehaviorMode::ExplicitPreview)
        );
        assert_eq!(
            "PREVIEW_BY_DEFAULT".parse::<BehaviorMode>(),
            Ok(BehaviorMode::PreviewByDefault)
        );
        assert_eq!(
            "sometimes".parse::<BehaviorMode>(),
            Err(UnknownBehaviorMode("sometimes".to_string()))
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: PreviewConfig = toml::from_str(
            r#"
preview_behavior = "explicit-preview"
tree_toggle_one_click = true
"#,
        )
        .expect("Failed to parse config");

        assert_eq!(config.behavior_mode(), Ok(BehaviorMode::ExplicitPreview));
        assert!(config.open_editor_on_edit_preview);
        assert_eq!(config.toggle_click_count(), ToggleClickCount::One);
    }

    #[test]
    fn test_setting_key_names() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::from_name(key.name()), Some(key));
        }
        assert_eq!(
            SettingKey::TreeToggleOneClick.name(),
            "ProjectViewToggleOneClick"
        );
        assert_eq!(SettingKey::from_name("Nope"), None);
    }

    #[test]
    fn test_config_value_lookup() {
        let config = PreviewConfig {
            tree_focus_support: true,
            ..PreviewConfig::default()
        };
        assert_eq!(
            config.value(SettingKey::TreeFocusSupport),
            SettingValue::Bool(true)
        );
        assert_eq!(
            config.value(SettingKey::PreviewBehavior),
            SettingValue::Text("preview-by-default".to_string())
        );
        assert_eq!(SettingValue::Bool(false).as_bool(), Some(false));
        assert_eq!(SettingValue::Text("x".into()).as_bool(), None);
    }
}

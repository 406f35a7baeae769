// ABOUTME: Error taxonomy for the preview lifecycle
// ABOUTME: Configuration errors and protocol misuse surface; transient misses never do

use glance_types::{TreeId, UnknownBehaviorMode};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PreviewError>;

#[derive(Debug, Error)]
pub enum PreviewError {
    /// The configured behavior mode has no branch in the state machine
    #[error("Unhandled preview behavior '{value}'")]
    UnhandledBehaviorMode { value: String },

    #[error("Tree handlers already registered for {tree}")]
    TreeAlreadyRegistered { tree: TreeId },

    #[error("Can not unregister handlers of unregistered {tree}")]
    TreeNotRegistered { tree: TreeId },

    #[error("Preview coordinator already disposed")]
    AlreadyDisposed,

    #[error("Failed to read settings from {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl From<UnknownBehaviorMode> for PreviewError {
    fn from(error: UnknownBehaviorMode) -> Self {
        Self::UnhandledBehaviorMode { value: error.0 }
    }
}

impl PreviewError {
    /// Programming errors in how the host drives the coordinator
    pub fn is_protocol_misuse(&self) -> bool {
        matches!(
            self,
            Self::TreeAlreadyRegistered { .. } | Self::TreeNotRegistered { .. } | Self::AlreadyDisposed
        )
    }

    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnhandledBehaviorMode { .. } | Self::SettingsIo { .. } | Self::SettingsParse { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_mode_conversion() {
        let error: PreviewError = UnknownBehaviorMode("sometimes".to_string()).into();
        assert!(matches!(
            &error,
            PreviewError::UnhandledBehaviorMode { value } if value == "sometimes"
        ));
        assert!(error.is_configuration());
        assert!(!error.is_protocol_misuse());
    }

    #[test]
    fn test_error_classes() {
        let misuse = PreviewError::TreeNotRegistered {
            tree: TreeId::new(4),
        };
        assert!(misuse.is_protocol_misuse());
        assert_eq!(
            misuse.to_string(),
            "Can not unregister handlers of unregistered tree#4"
        );
        assert!(PreviewError::AlreadyDisposed.is_protocol_misuse());
    }
}

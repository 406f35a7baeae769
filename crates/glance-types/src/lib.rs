// ABOUTME: Pure data types with no cross-crate dependencies
// ABOUTME: Foundation layer for all other glance crates

pub mod config;
pub mod file;
pub mod input;

// Re-export commonly used types
pub use config::{BehaviorMode, PreviewConfig, SettingKey, SettingValue, UnknownBehaviorMode};
pub use file::{FileHandle, TreeId};
pub use input::{MouseButton, ToggleClickCount, TreeKey};

// ABOUTME: Single-click preview lifecycle for navigation trees and editor tabs
// ABOUTME: Coordinates preview marks, tree handlers and UI-thread dispatch

pub mod capabilities;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod preview_state;
pub mod registry;
pub mod settings;
pub mod snapshot;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

#[cfg(test)]
mod tests;

pub use capabilities::{
    DocumentObserver, EditorManager, NavigationTree, ObserverHandle, SettingsStore, Workspace,
};
pub use coordinator::{PreviewCoordinator, PreviewEvent, PreviewServices};
pub use dispatch::{UiDispatcher, UiExecutor, UiQueue, UiTask};
pub use error::{PreviewError, Result};
pub use preview_state::{PreviewMark, PreviewTracker};
pub use registry::TreeRegistry;
pub use settings::{PreviewSettings, SETTINGS_FILE_NAME};
pub use snapshot::{EditorKind, EditorSnapshot, EditorSnapshotFactory, EditorView, SplitLayout};

// ABOUTME: Capability traits for the collaborators the preview lifecycle drives
// ABOUTME: Hosts implement these for their workspace, editor manager, trees and settings

use glance_events::{
    DocumentListener, EditorListener, SettingsListener, SubscriptionId, TreeListener,
};
use glance_types::{
    BehaviorMode, FileHandle, PreviewConfig, ToggleClickCount, TreeId, UnknownBehaviorMode,
};

/// Workspace/session the coordinator is bound to
pub trait Workspace: Send + Sync {
    /// False once the workspace has been torn down; queued UI work is dropped then
    fn is_alive(&self) -> bool;

    /// The navigation tree currently shown to the user, if any
    fn active_tree(&self) -> Option<TreeId>;

    /// Whether the active tree follows the active editor ("autoscroll from source")
    fn is_autoscroll_from_source(&self) -> bool {
        false
    }
}

/// Editor tab management capabilities
pub trait EditorManager: Send + Sync {
    /// Open `file` in the reusable preview tab
    fn open_preview(&self, file: &FileHandle);

    /// Open `file` in (or switch to) an ordinary, permanent tab
    fn open_ordinary_editor(&self, file: &FileHandle);

    fn is_open(&self, file: &FileHandle) -> bool;

    /// Bring the tab of an open file to front; `focus_content_area` also moves keyboard focus
    fn focus(&self, file: &FileHandle, focus_content_area: bool);

    /// Recompute the tab's title/styling, e.g. to drop the preview look
    fn refresh_presentation(&self, file: &FileHandle);

    fn close_file(&self, file: &FileHandle);

    /// Map a tree selection to the file that should actually be opened.
    /// Hosts override this for nodes that stand in for another file.
    fn navigation_target(&self, file: &FileHandle) -> Option<FileHandle> {
        Some(file.clone())
    }

    fn subscribe(&self, listener: EditorListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// A navigation tree widget
pub trait NavigationTree: Send + Sync {
    fn id(&self) -> TreeId;

    /// The file behind the current selection; None for folders or an empty selection
    fn resolve_file_for_selection(&self) -> Option<FileHandle>;

    fn has_focus(&self) -> bool;

    fn request_focus(&self);

    fn set_toggle_click_count(&self, count: ToggleClickCount);

    fn subscribe(&self, listener: TreeListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// Typed access to the preview settings.
///
/// Getters are read at every decision point and must reflect changes made
/// from other threads.
pub trait SettingsStore: Send + Sync {
    fn snapshot(&self) -> PreviewConfig;

    fn behavior_mode(&self) -> Result<BehaviorMode, UnknownBehaviorMode> {
        self.snapshot().behavior_mode()
    }

    fn preview_closed_on_tab_change(&self) -> bool {
        self.snapshot().preview_closed_on_tab_change
    }

    fn open_editor_on_edit_preview(&self) -> bool {
        self.snapshot().open_editor_on_edit_preview
    }

    fn tree_focus_support(&self) -> bool {
        self.snapshot().tree_focus_support
    }

    fn toggle_click_count(&self) -> ToggleClickCount {
        self.snapshot().toggle_click_count()
    }

    fn subscribe(&self, listener: SettingsListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// Handle for a content watch registered with a [`DocumentObserver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(pub u64);

/// Reports content modifications of watched files
pub trait DocumentObserver: Send + Sync {
    /// Start reporting changes of `file`; None when the file has no loaded document
    fn watch(&self, file: &FileHandle) -> Option<ObserverHandle>;

    fn unwatch(&self, handle: ObserverHandle);

    fn subscribe(&self, listener: DocumentListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

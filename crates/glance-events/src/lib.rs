// ABOUTME: Event definitions for every collaborator that feeds the preview lifecycle
// ABOUTME: Each source gets its own bounded-context module plus a shared handler trait

pub mod document;
pub mod editor;
pub mod settings;
pub mod tree;

use std::sync::Arc;

use document::Event as DocumentEvent;
use editor::Event as EditorEvent;
use settings::Event as SettingsEvent;
use tree::Event as TreeEvent;

/// Subscription identifier handed out by event sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl SubscriptionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Callback registered with an event source.
///
/// Sources may invoke listeners from any thread, so listeners must not
/// assume they run on the UI thread.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

pub type TreeListener = Listener<TreeEvent>;
pub type EditorListener = Listener<EditorEvent>;
pub type SettingsListener = Listener<SettingsEvent>;
pub type DocumentListener = Listener<DocumentEvent>;

/// Event handler trait for receiving collaborator events
pub trait EventHandler {
    /// Handle a navigation tree event
    fn handle_tree(&self, _event: &TreeEvent) {}

    /// Handle an editor manager event
    fn handle_editor(&self, _event: &EditorEvent) {}

    /// Handle a settings change
    fn handle_settings(&self, _event: &SettingsEvent) {}

    /// Handle a document content event
    fn handle_document(&self, _event: &DocumentEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_types::{FileHandle, TreeId};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl EventHandler for Recorder {
        fn handle_tree(&self, event: &TreeEvent) {
            self.seen.lock().unwrap().push(format!("tree:{event:?}"));
        }

        fn handle_editor(&self, event: &EditorEvent) {
            self.seen.lock().unwrap().push(format!("editor:{event:?}"));
        }
    }

    #[test]
    fn test_default_handlers_are_noops() {
        let recorder = Recorder::default();
        recorder.handle_settings(&SettingsEvent::changed(
            glance_types::SettingKey::TreeFocusSupport,
            glance_types::SettingValue::Bool(true),
        ));
        recorder.handle_document(&DocumentEvent::ContentChanged {
            file: FileHandle::new("/a.rs"),
        });
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_listener_alias_is_callable() {
        let recorder = Arc::new(Recorder::default());
        let sink = recorder.clone();
        let listener: TreeListener = Arc::new(move |event| sink.handle_tree(event));

        listener(&TreeEvent::SelectionChanged {
            tree: TreeId::new(1),
        });
        let editor_listener: EditorListener = {
            let sink = recorder.clone();
            Arc::new(move |event| sink.handle_editor(event))
        };
        editor_listener(&EditorEvent::BeforeClose {
            file: FileHandle::new("/a.rs"),
        });

        assert_eq!(recorder.seen.lock().unwrap().len(), 2);
    }
}

// ABOUTME: Reacts to tree, editor, document and settings events to drive preview tabs
// ABOUTME: All collaborator events funnel into PreviewEvent and one handle() function

use glance_events::document::Event as DocumentEvent;
use glance_events::editor::Event as EditorEvent;
use glance_events::settings::Event as SettingsEvent;
use glance_events::tree::Event as TreeEvent;
use glance_events::{EventHandler, SubscriptionId};
use glance_logging::{debug, error, info, instrument, trace};
use glance_types::{
    BehaviorMode, FileHandle, MouseButton, SettingKey, SettingValue, ToggleClickCount, TreeId,
    TreeKey,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::capabilities::{
    DocumentObserver, EditorManager, NavigationTree, SettingsStore, Workspace,
};
use crate::dispatch::{UiDispatcher, UiExecutor};
use crate::error::{PreviewError, Result};
use crate::preview_state::PreviewTracker;
use crate::registry::TreeRegistry;

/// Everything the coordinator reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewEvent {
    TreeSelectionChanged {
        tree: TreeId,
    },
    TreeMouseClicked {
        tree: TreeId,
        button: MouseButton,
        click_count: u32,
    },
    TreeKeyPressed {
        tree: TreeId,
        key: TreeKey,
    },
    EditorSelectionChanged {
        new_file: Option<FileHandle>,
    },
    BeforeFileOpened {
        file: FileHandle,
    },
    BeforeFileClosed {
        file: FileHandle,
    },
    FileOpened {
        file: FileHandle,
    },
    FileClosed {
        file: FileHandle,
    },
    ContentChanged {
        file: FileHandle,
    },
    SettingsChanged {
        key: SettingKey,
        value: SettingValue,
    },
}

impl From<&TreeEvent> for PreviewEvent {
    fn from(event: &TreeEvent) -> Self {
        match event {
            TreeEvent::SelectionChanged { tree } => Self::TreeSelectionChanged { tree: *tree },
            TreeEvent::MouseClicked {
                tree,
                button,
                click_count,
            } => Self::TreeMouseClicked {
                tree: *tree,
                button: *button,
                click_count: *click_count,
            },
            TreeEvent::KeyPressed { tree, key } => Self::TreeKeyPressed {
                tree: *tree,
                key: *key,
            },
        }
    }
}

impl From<&EditorEvent> for PreviewEvent {
    fn from(event: &EditorEvent) -> Self {
        match event {
            EditorEvent::BeforeOpen { file } => Self::BeforeFileOpened { file: file.clone() },
            EditorEvent::BeforeClose { file } => Self::BeforeFileClosed { file: file.clone() },
            EditorEvent::AfterOpen { file } => Self::FileOpened { file: file.clone() },
            EditorEvent::AfterClose { file } => Self::FileClosed { file: file.clone() },
            EditorEvent::SelectionChanged { new_file } => Self::EditorSelectionChanged {
                new_file: new_file.clone(),
            },
        }
    }
}

impl From<&SettingsEvent> for PreviewEvent {
    fn from(event: &SettingsEvent) -> Self {
        Self::SettingsChanged {
            key: event.key(),
            value: event.new_value().clone(),
        }
    }
}

impl From<&DocumentEvent> for PreviewEvent {
    fn from(event: &DocumentEvent) -> Self {
        Self::ContentChanged {
            file: event.file().clone(),
        }
    }
}

/// Collaborators a coordinator is built from
#[derive(Clone)]
pub struct PreviewServices {
    pub workspace: Arc<dyn Workspace>,
    pub editor: Arc<dyn EditorManager>,
    pub documents: Arc<dyn DocumentObserver>,
    pub settings: Arc<dyn SettingsStore>,
    pub executor: Arc<dyn UiExecutor>,
}

#[derive(Debug, Clone, Copy)]
struct Subscriptions {
    editor: SubscriptionId,
    documents: SubscriptionId,
    settings: SubscriptionId,
}

struct CoordinatorInner {
    this: Weak<CoordinatorInner>,
    workspace: Arc<dyn Workspace>,
    editor: Arc<dyn EditorManager>,
    documents: Arc<dyn DocumentObserver>,
    settings: Arc<dyn SettingsStore>,
    dispatcher: UiDispatcher,
    tracker: PreviewTracker,
    registry: TreeRegistry,
    subscriptions: Mutex<Option<Subscriptions>>,
    disposed: AtomicBool,
}

/// Preview lifecycle for one workspace.
///
/// Cloning is cheap and every clone drives the same state. Collaborator
/// listeners only hold weak references, so dropping the last clone without
/// calling [`PreviewCoordinator::dispose`] leaves listeners that do nothing.
#[derive(Clone)]
pub struct PreviewCoordinator {
    inner: Arc<CoordinatorInner>,
}

impl PreviewCoordinator {
    /// Create a coordinator and subscribe it to the editor manager, documents and settings
    pub fn new(services: PreviewServices) -> Self {
        let PreviewServices {
            workspace,
            editor,
            documents,
            settings,
            executor,
        } = services;

        let dispatcher = UiDispatcher::new(executor, workspace.clone());
        let tracker = PreviewTracker::new(
            editor.clone(),
            documents.clone(),
            settings.clone(),
            dispatcher.clone(),
        );

        let inner = Arc::new_cyclic(|this| CoordinatorInner {
            this: this.clone(),
            workspace,
            editor,
            documents,
            settings,
            dispatcher,
            tracker,
            registry: TreeRegistry::new(),
            subscriptions: Mutex::new(None),
            disposed: AtomicBool::new(false),
        });

        let subscriptions = Subscriptions {
            editor: inner.editor.subscribe(inner.listener(CoordinatorInner::handle_editor)),
            documents: inner
                .documents
                .subscribe(inner.listener(CoordinatorInner::handle_document)),
            settings: inner
                .settings
                .subscribe(inner.listener(CoordinatorInner::handle_settings)),
        };
        *inner.subscriptions.lock() = Some(subscriptions);

        info!("Preview coordinator created");
        Self { inner }
    }

    /// Process one event; configuration errors from the decision are returned
    pub fn handle(&self, event: PreviewEvent) -> Result<()> {
        self.inner.handle(event)
    }

    pub fn tracker(&self) -> &PreviewTracker {
        &self.inner.tracker
    }

    pub fn dispatcher(&self) -> &UiDispatcher {
        &self.inner.dispatcher
    }

    /// Whether the owning workspace is still alive
    pub fn is_valid(&self) -> bool {
        self.inner.dispatcher.is_valid()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    pub fn register_tree_handlers(&self, tree: Arc<dyn NavigationTree>) -> Result<()> {
        if self.is_disposed() {
            error!(tree = %tree.id(), "Tree registration after dispose");
            return Err(PreviewError::AlreadyDisposed);
        }

        let listener = self.inner.listener(CoordinatorInner::handle_tree);
        self.inner
            .registry
            .register(tree, listener, self.inner.settings.toggle_click_count())
    }

    pub fn unregister_tree_handlers(&self, tree: TreeId) -> Result<()> {
        self.inner.registry.unregister(tree)
    }

    pub fn unregister_all_tree_handlers(&self) {
        self.inner.registry.unregister_all();
    }

    pub fn are_tree_handlers_registered(&self, tree: TreeId) -> bool {
        self.inner.registry.is_registered(tree)
    }

    /// Open a preview of the tree's selection, or focus its tab, per the behavior mode
    pub fn open_or_focus_selected_file(&self, tree: &Arc<dyn NavigationTree>) -> Result<()> {
        self.inner.open_or_focus_selected_file(tree)
    }

    /// Bring an already open file's tab to front without opening or closing anything
    pub fn focus_file_editor(&self, file: &FileHandle, focus_content_area: bool) {
        self.inner.focus_file_editor(file, focus_content_area);
    }

    /// Close every preview, detach from all collaborators and unregister all trees
    pub fn dispose(&self) -> Result<()> {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            error!("Preview coordinator disposed twice");
            return Err(PreviewError::AlreadyDisposed);
        }

        if !self.inner.tracker.close_all_previews_and_wait() {
            debug!("Workspace already gone, previews not closed");
        }

        if let Some(subscriptions) = self.inner.subscriptions.lock().take() {
            self.inner.editor.unsubscribe(subscriptions.editor);
            self.inner.documents.unsubscribe(subscriptions.documents);
            self.inner.settings.unsubscribe(subscriptions.settings);
        }
        self.inner.registry.unregister_all();

        info!("Preview coordinator disposed");
        Ok(())
    }
}

impl EventHandler for PreviewCoordinator {
    fn handle_tree(&self, event: &TreeEvent) {
        self.inner.handle_tree(event);
    }

    fn handle_editor(&self, event: &EditorEvent) {
        self.inner.handle_editor(event);
    }

    fn handle_settings(&self, event: &SettingsEvent) {
        self.inner.handle_settings(event);
    }

    fn handle_document(&self, event: &DocumentEvent) {
        self.inner.handle_document(event);
    }
}

impl EventHandler for CoordinatorInner {
    fn handle_tree(&self, event: &TreeEvent) {
        self.report(self.handle(event.into()));
    }

    fn handle_editor(&self, event: &EditorEvent) {
        self.report(self.handle(event.into()));
    }

    fn handle_settings(&self, event: &SettingsEvent) {
        self.report(self.handle(event.into()));
    }

    fn handle_document(&self, event: &DocumentEvent) {
        self.report(self.handle(event.into()));
    }
}

impl CoordinatorInner {
    /// Wrap a handler method into a listener that holds only a weak reference
    fn listener<E: 'static>(
        &self,
        handler: fn(&CoordinatorInner, &E),
    ) -> glance_events::Listener<E> {
        let this = self.this.clone();
        Arc::new(move |event: &E| {
            if let Some(inner) = this.upgrade() {
                handler(&inner, event);
            }
        })
    }

    fn report(&self, result: Result<()>) {
        if let Err(e) = result {
            error!(error = %e, "Preview event handling failed");
        }
    }

    #[instrument(level = "trace", skip(self))]
    fn handle(&self, event: PreviewEvent) -> Result<()> {
        if self.disposed.load(Ordering::Acquire) {
            trace!("Coordinator disposed, ignoring event");
            return Ok(());
        }

        match event {
            PreviewEvent::TreeSelectionChanged { tree } => {
                let Some(tree) = self.registry.get(tree) else {
                    debug!(tree = %tree, "Selection change from an unregistered tree");
                    return Ok(());
                };
                self.open_or_focus_selected_file(&tree)
            }
            PreviewEvent::TreeMouseClicked {
                tree,
                button,
                click_count,
            } => {
                if button == MouseButton::Left && click_count == 2 {
                    self.pin_selected_file(tree);
                }
                Ok(())
            }
            PreviewEvent::TreeKeyPressed { tree, key } => {
                match key {
                    TreeKey::Enter => self.pin_selected_file(tree),
                    TreeKey::Space => self.request_preview(tree),
                    TreeKey::Escape | TreeKey::Other => {}
                }
                Ok(())
            }
            PreviewEvent::EditorSelectionChanged { new_file } => {
                self.on_editor_selection_changed(new_file.as_ref())
            }
            PreviewEvent::BeforeFileOpened { file } => self.before_file_opened(&file),
            PreviewEvent::BeforeFileClosed { file } => {
                self.tracker.dispose_preview(Some(&file), true);
                Ok(())
            }
            PreviewEvent::FileOpened { .. } | PreviewEvent::FileClosed { .. } => {
                self.focus_tree_if_needed();
                Ok(())
            }
            PreviewEvent::ContentChanged { file } => {
                if self.tracker.is_previewed(Some(&file)) {
                    self.tracker.promote(&file);
                }
                Ok(())
            }
            PreviewEvent::SettingsChanged { key, value } => {
                if key == SettingKey::TreeToggleOneClick {
                    self.propagate_toggle_click_count(&value);
                }
                Ok(())
            }
        }
    }

    fn behavior_mode(&self) -> Result<BehaviorMode> {
        self.settings.behavior_mode().map_err(|e| {
            error!(value = %e.0, "Unhandled preview behavior");
            PreviewError::from(e)
        })
    }

    fn active_tree(&self) -> Option<Arc<dyn NavigationTree>> {
        self.workspace
            .active_tree()
            .and_then(|id| self.registry.get(id))
    }

    /// The file a tree's selection navigates to
    fn selected_file(&self, tree: &dyn NavigationTree) -> Option<FileHandle> {
        tree.resolve_file_for_selection()
            .and_then(|file| self.editor.navigation_target(&file))
    }

    fn on_editor_selection_changed(&self, new_file: Option<&FileHandle>) -> Result<()> {
        if self.behavior_mode()? == BehaviorMode::ExplicitPreview
            || self.tracker.is_previewed(new_file)
        {
            return Ok(());
        }

        let Some(selected) = self
            .active_tree()
            .and_then(|tree| self.selected_file(tree.as_ref()))
        else {
            trace!("No tree selection, keeping previews");
            return Ok(());
        };

        if self.settings.preview_closed_on_tab_change()
            || !self.tracker.is_previewed(Some(&selected))
        {
            debug!(selected = %selected, "Editor tab changed, closing previews");
            self.tracker.close_all_previews();
        }
        Ok(())
    }

    fn before_file_opened(&self, file: &FileHandle) -> Result<()> {
        if self.tracker.is_previewed(Some(file)) {
            self.tracker.close_other_previews(file);
            return Ok(());
        }

        let selected = self
            .active_tree()
            .and_then(|tree| self.selected_file(tree.as_ref()));
        if selected.as_ref() == Some(file) && self.behavior_mode()? != BehaviorMode::ExplicitPreview
        {
            self.tracker.close_other_previews(file);
        }
        Ok(())
    }

    fn open_or_focus_selected_file(&self, tree: &Arc<dyn NavigationTree>) -> Result<()> {
        self.focus_tree_if_selected_file_is_not_open(tree);

        let this = self.this.clone();
        let tree = tree.clone();
        match self.behavior_mode()? {
            BehaviorMode::PreviewByDefault => {
                self.dispatcher.invoke_safe(move || {
                    if let Some(inner) = this.upgrade() {
                        inner.open_preview_or_editor(tree.as_ref());
                    }
                });
            }
            BehaviorMode::ExplicitPreview => {
                self.dispatcher.invoke_safe(move || {
                    if let Some(inner) = this.upgrade()
                        && let Some(file) = inner.selected_file(tree.as_ref())
                    {
                        inner.focus_file_editor(&file, false);
                    }
                });
            }
        }
        Ok(())
    }

    fn focus_tree_if_selected_file_is_not_open(&self, tree: &Arc<dyn NavigationTree>) {
        let Some(file) = self.selected_file(tree.as_ref()) else {
            return;
        };

        if !self.editor.is_open(&file) && !tree.has_focus() {
            trace!(tree = %tree.id(), file = %file, "Keeping focus on the tree");
            let tree = tree.clone();
            self.dispatcher.invoke_safe(move || tree.request_focus());
        }
    }

    /// Runs on the UI thread
    fn open_preview_or_editor(&self, tree: &dyn NavigationTree) {
        let Some(file) = self.selected_file(tree) else {
            trace!(tree = %tree.id(), "Selection has no file, nothing to open");
            return;
        };

        if self.editor.is_open(&file) && !self.tracker.is_previewed(Some(&file)) {
            debug!(file = %file, "Already open as a permanent editor");
            self.editor.open_ordinary_editor(&file);
            return;
        }

        info!(file = %file, "Opening preview");
        self.tracker.close_other_previews_now(&file);
        self.tracker.prepare_preview_now(&file);
        self.editor.open_preview(&file);

        if !self.editor.is_open(&file) {
            debug!(file = %file, "Editor did not open the preview, clearing mark");
            self.tracker.dispose_preview_now(&file, false);
        }
    }

    fn focus_file_editor(&self, file: &FileHandle, focus_content_area: bool) {
        if !self.dispatcher.is_valid() {
            return;
        }
        if !self.editor.is_open(file) {
            trace!(file = %file, "File not open, nothing to focus");
            return;
        }

        let editor = self.editor.clone();
        let file = file.clone();
        self.dispatcher
            .invoke_safe(move || editor.focus(&file, focus_content_area));
    }

    /// Double click or Enter keeps the selected file open as an ordinary tab
    fn pin_selected_file(&self, tree: TreeId) {
        let Some(file) = self
            .registry
            .get(tree)
            .and_then(|tree| self.selected_file(tree.as_ref()))
        else {
            trace!(tree = %tree, "Nothing selected to pin");
            return;
        };

        if self.tracker.is_previewed(Some(&file)) {
            info!(file = %file, "Pinning preview");
        }
        self.tracker.dispose_preview(Some(&file), true);
    }

    /// Explicit preview request, honored in every behavior mode
    fn request_preview(&self, tree: TreeId) {
        let Some(tree) = self.registry.get(tree) else {
            debug!(tree = %tree, "Preview request from an unregistered tree");
            return;
        };

        let this = self.this.clone();
        self.dispatcher.invoke_safe(move || {
            if let Some(inner) = this.upgrade() {
                inner.open_preview_or_editor(tree.as_ref());
            }
        });
    }

    fn focus_tree_if_needed(&self) {
        if !self.settings.tree_focus_support() || self.workspace.is_autoscroll_from_source() {
            return;
        }
        if let Some(tree) = self.active_tree() {
            self.dispatcher.invoke_safe(move || tree.request_focus());
        }
    }

    fn propagate_toggle_click_count(&self, value: &SettingValue) {
        let count = value
            .as_bool()
            .map(ToggleClickCount::from_one_click)
            .unwrap_or_else(|| self.settings.toggle_click_count());
        let trees = self.registry.trees();
        debug!(
            click_count = count.as_u32(),
            trees = trees.len(),
            "Propagating toggle click count"
        );

        self.dispatcher.invoke_safe(move || {
            for tree in trees {
                tree.set_toggle_click_count(count);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_types::SettingValue;

    #[test]
    fn test_tree_event_conversion() {
        let event = TreeEvent::MouseClicked {
            tree: TreeId::new(2),
            button: MouseButton::Left,
            click_count: 2,
        };
        assert_eq!(
            PreviewEvent::from(&event),
            PreviewEvent::TreeMouseClicked {
                tree: TreeId::new(2),
                button: MouseButton::Left,
                click_count: 2,
            }
        );
    }

    #[test]
    fn test_editor_event_conversion() {
        let file = FileHandle::new("/work/a.rs");
        assert_eq!(
            PreviewEvent::from(&EditorEvent::BeforeClose { file: file.clone() }),
            PreviewEvent::BeforeFileClosed { file: file.clone() }
        );
        assert_eq!(
            PreviewEvent::from(&EditorEvent::SelectionChanged { new_file: None }),
            PreviewEvent::EditorSelectionChanged { new_file: None }
        );
    }

    #[test]
    fn test_settings_event_conversion_keeps_new_value() {
        let event = SettingsEvent::Changed {
            key: SettingKey::TreeToggleOneClick,
            old_value: Some(SettingValue::Bool(false)),
            new_value: SettingValue::Bool(true),
        };
        assert_eq!(
            PreviewEvent::from(&event),
            PreviewEvent::SettingsChanged {
                key: SettingKey::TreeToggleOneClick,
                value: SettingValue::Bool(true),
            }
        );
    }
}

// ABOUTME: In-memory fakes of every collaborator plus a wired-up coordinator harness
// ABOUTME: Fakes record calls and fire events synchronously without holding their locks

use glance_events::document::Event as DocumentEvent;
use glance_events::editor::Event as EditorEvent;
use glance_events::tree::Event as TreeEvent;
use glance_events::{DocumentListener, EditorListener, Listener, SubscriptionId, TreeListener};
use glance_types::{FileHandle, MouseButton, PreviewConfig, ToggleClickCount, TreeId, TreeKey};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use crate::capabilities::{
    DocumentObserver, EditorManager, NavigationTree, ObserverHandle, Workspace,
};
use crate::coordinator::{PreviewCoordinator, PreviewServices};
use crate::dispatch::UiQueue;
use crate::settings::PreviewSettings;

/// Subscriber list shared by the fakes
pub struct Listeners<E> {
    entries: Mutex<Vec<(SubscriptionId, Listener<E>)>>,
    next_id: AtomicU64,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<E> Listeners<E> {
    pub fn subscribe(&self, listener: Listener<E>) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push((id, listener));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.entries.lock().retain(|(existing, _)| *existing != id);
    }

    pub fn emit(&self, event: &E) {
        let listeners: Vec<Listener<E>> = self
            .entries
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

pub struct FakeWorkspace {
    alive: AtomicBool,
    active_tree: Mutex<Option<TreeId>>,
    autoscroll_from_source: AtomicBool,
}

impl Default for FakeWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWorkspace {
    pub fn new() -> Self {
        Self {
            alive: AtomicBool::new(true),
            active_tree: Mutex::new(None),
            autoscroll_from_source: AtomicBool::new(false),
        }
    }

    pub fn dispose(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    pub fn set_active_tree(&self, tree: Option<TreeId>) {
        *self.active_tree.lock() = tree;
    }

    pub fn set_autoscroll_from_source(&self, enabled: bool) {
        self.autoscroll_from_source.store(enabled, Ordering::SeqCst);
    }
}

impl Workspace for FakeWorkspace {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn active_tree(&self) -> Option<TreeId> {
        *self.active_tree.lock()
    }

    fn is_autoscroll_from_source(&self) -> bool {
        self.autoscroll_from_source.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCall {
    OpenPreview(FileHandle),
    OpenOrdinary(FileHandle),
    Focus(FileHandle, bool),
    RefreshPresentation(FileHandle),
    Close(FileHandle),
}

/// Editor manager that keeps a set of open files and records every request
#[derive(Default)]
pub struct FakeEditor {
    open: Mutex<BTreeSet<FileHandle>>,
    calls: Mutex<Vec<EditorCall>>,
    targets: Mutex<HashMap<FileHandle, FileHandle>>,
    refused: Mutex<BTreeSet<FileHandle>>,
    listeners: Listeners<EditorEvent>,
}

impl FakeEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `file` as already open, without events or recorded calls
    pub fn mark_open(&self, file: &FileHandle) {
        self.open.lock().insert(file.clone());
    }

    pub fn is_open_now(&self, file: &FileHandle) -> bool {
        self.open.lock().contains(file)
    }

    pub fn open_files(&self) -> Vec<FileHandle> {
        self.open.lock().iter().cloned().collect()
    }

    pub fn calls(&self) -> Vec<EditorCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self, predicate: impl Fn(&EditorCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Make selections of `from` navigate to `to`
    pub fn set_navigation_target(&self, from: &FileHandle, to: &FileHandle) {
        self.targets.lock().insert(from.clone(), to.clone());
    }

    /// Make every later request to open `file` fail silently
    pub fn refuse_open(&self, file: &FileHandle) {
        self.refused.lock().insert(file.clone());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Switch the active tab, as a user clicking on it would
    pub fn activate(&self, file: Option<&FileHandle>) {
        self.listeners.emit(&EditorEvent::SelectionChanged {
            new_file: file.cloned(),
        });
    }

    fn record(&self, call: EditorCall) {
        self.calls.lock().push(call);
    }

    /// Opening a file, new or already open, makes its tab the active one
    fn open(&self, file: &FileHandle) {
        if self.refused.lock().contains(file) {
            return;
        }
        if !self.is_open_now(file) {
            self.listeners
                .emit(&EditorEvent::BeforeOpen { file: file.clone() });
            self.open.lock().insert(file.clone());
            self.listeners
                .emit(&EditorEvent::AfterOpen { file: file.clone() });
        }
        self.activate(Some(file));
    }
}

impl EditorManager for FakeEditor {
    fn open_preview(&self, file: &FileHandle) {
        self.record(EditorCall::OpenPreview(file.clone()));
        self.open(file);
    }

    fn open_ordinary_editor(&self, file: &FileHandle) {
        self.record(EditorCall::OpenOrdinary(file.clone()));
        self.open(file);
    }

    fn is_open(&self, file: &FileHandle) -> bool {
        self.is_open_now(file)
    }

    fn focus(&self, file: &FileHandle, focus_content_area: bool) {
        self.record(EditorCall::Focus(file.clone(), focus_content_area));
    }

    fn refresh_presentation(&self, file: &FileHandle) {
        self.record(EditorCall::RefreshPresentation(file.clone()));
    }

    fn close_file(&self, file: &FileHandle) {
        self.record(EditorCall::Close(file.clone()));
        if !self.is_open_now(file) {
            return;
        }
        self.listeners
            .emit(&EditorEvent::BeforeClose { file: file.clone() });
        self.open.lock().remove(file);
        self.listeners
            .emit(&EditorEvent::AfterClose { file: file.clone() });
    }

    fn navigation_target(&self, file: &FileHandle) -> Option<FileHandle> {
        let target = self.targets.lock().get(file).cloned();
        Some(target.unwrap_or_else(|| file.clone()))
    }

    fn subscribe(&self, listener: EditorListener) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.unsubscribe(id);
    }
}

/// Navigation tree with a single selected file
pub struct FakeTree {
    id: TreeId,
    selection: Mutex<Option<FileHandle>>,
    focused: AtomicBool,
    focus_requests: AtomicUsize,
    toggle_click_count: Mutex<Option<ToggleClickCount>>,
    listeners: Listeners<TreeEvent>,
}

impl FakeTree {
    pub fn new(id: u64) -> Self {
        Self {
            id: TreeId::new(id),
            selection: Mutex::new(None),
            focused: AtomicBool::new(false),
            focus_requests: AtomicUsize::new(0),
            toggle_click_count: Mutex::new(None),
            listeners: Listeners::default(),
        }
    }

    /// Change the selection and notify listeners
    pub fn select(&self, file: Option<&FileHandle>) {
        self.set_selection(file);
        self.listeners
            .emit(&TreeEvent::SelectionChanged { tree: self.id });
    }

    /// Change the selection silently
    pub fn set_selection(&self, file: Option<&FileHandle>) {
        *self.selection.lock() = file.cloned();
    }

    pub fn click(&self, button: MouseButton, click_count: u32) {
        self.listeners.emit(&TreeEvent::MouseClicked {
            tree: self.id,
            button,
            click_count,
        });
    }

    pub fn double_click(&self) {
        self.click(MouseButton::Left, 2);
    }

    pub fn press(&self, key: TreeKey) {
        self.listeners
            .emit(&TreeEvent::KeyPressed { tree: self.id, key });
    }

    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::SeqCst);
    }

    pub fn focus_requests(&self) -> usize {
        self.focus_requests.load(Ordering::SeqCst)
    }

    pub fn toggle_click_count(&self) -> Option<ToggleClickCount> {
        *self.toggle_click_count.lock()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl NavigationTree for FakeTree {
    fn id(&self) -> TreeId {
        self.id
    }

    fn resolve_file_for_selection(&self) -> Option<FileHandle> {
        self.selection.lock().clone()
    }

    fn has_focus(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }

    fn request_focus(&self) {
        self.focus_requests.fetch_add(1, Ordering::SeqCst);
        self.focused.store(true, Ordering::SeqCst);
    }

    fn set_toggle_click_count(&self, count: ToggleClickCount) {
        *self.toggle_click_count.lock() = Some(count);
    }

    fn subscribe(&self, listener: TreeListener) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.unsubscribe(id);
    }
}

/// Document observer that reports edits of watched files
#[derive(Default)]
pub struct FakeDocuments {
    watches: Mutex<HashMap<ObserverHandle, FileHandle>>,
    watch_counts: Mutex<HashMap<FileHandle, usize>>,
    next_handle: AtomicU64,
    listeners: Listeners<DocumentEvent>,
}

impl FakeDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a content edit; only watched files report it
    pub fn edit(&self, file: &FileHandle) {
        let watched = self.watches.lock().values().any(|watched| watched == file);
        if watched {
            self.listeners
                .emit(&DocumentEvent::ContentChanged { file: file.clone() });
        }
    }

    pub fn active_watches(&self) -> usize {
        self.watches.lock().len()
    }

    /// Total number of `watch` calls made for `file`
    pub fn watch_count(&self, file: &FileHandle) -> usize {
        self.watch_counts.lock().get(file).copied().unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl DocumentObserver for FakeDocuments {
    fn watch(&self, file: &FileHandle) -> Option<ObserverHandle> {
        let handle = ObserverHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.watches.lock().insert(handle, file.clone());
        *self.watch_counts.lock().entry(file.clone()).or_default() += 1;
        Some(handle)
    }

    fn unwatch(&self, handle: ObserverHandle) {
        self.watches.lock().remove(&handle);
    }

    fn subscribe(&self, listener: DocumentListener) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.unsubscribe(id);
    }
}

/// Coordinator wired to fakes, with one registered and active tree
pub struct Harness {
    pub queue: Arc<UiQueue>,
    pub workspace: Arc<FakeWorkspace>,
    pub editor: Arc<FakeEditor>,
    pub documents: Arc<FakeDocuments>,
    pub settings: Arc<PreviewSettings>,
    pub tree: Arc<FakeTree>,
    pub coordinator: PreviewCoordinator,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(PreviewConfig::default())
    }

    /// Build the harness on the calling thread, which becomes the UI thread
    pub fn with_config(config: PreviewConfig) -> Self {
        let queue = UiQueue::new();
        let workspace = Arc::new(FakeWorkspace::new());
        let editor = Arc::new(FakeEditor::new());
        let documents = Arc::new(FakeDocuments::new());
        let settings = Arc::new(PreviewSettings::new(config));

        let coordinator = PreviewCoordinator::new(PreviewServices {
            workspace: workspace.clone(),
            editor: editor.clone(),
            documents: documents.clone(),
            settings: settings.clone(),
            executor: queue.clone(),
        });

        let tree = Arc::new(FakeTree::new(1));
        workspace.set_active_tree(Some(tree.id()));
        if let Err(e) = coordinator.register_tree_handlers(tree.clone()) {
            panic!("fresh harness failed to register its tree: {e}");
        }

        Self {
            queue,
            workspace,
            editor,
            documents,
            settings,
            tree,
            coordinator,
        }
    }

    /// Run UI tasks until none are left
    pub fn drain(&self) -> usize {
        let mut total = 0;
        loop {
            let ran = self.queue.run_pending();
            if ran == 0 {
                return total;
            }
            total += ran;
        }
    }

    /// Select `path` in the tree and let the UI thread catch up
    pub fn select(&self, path: &str) -> FileHandle {
        let file = FileHandle::new(path);
        self.tree.select(Some(&file));
        self.drain();
        file
    }

    pub fn previewed(&self) -> Vec<FileHandle> {
        self.coordinator.tracker().previewed_files()
    }

    pub fn is_previewed(&self, file: &FileHandle) -> bool {
        self.coordinator.tracker().is_previewed(Some(file))
    }
}

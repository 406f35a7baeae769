// ABOUTME: Tracks which open files are previews and the content watch attached to each
// ABOUTME: Every mutation runs on the UI thread and is applied as one critical section

use glance_logging::{debug, info, trace};
use glance_types::FileHandle;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::capabilities::{DocumentObserver, EditorManager, ObserverHandle, SettingsStore};
use crate::dispatch::UiDispatcher;

/// Side-table entry for a previewed file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewMark {
    /// Present when edits should promote the preview
    pub observer: Option<ObserverHandle>,
}

struct TrackerState {
    marks: Mutex<HashMap<FileHandle, PreviewMark>>,
    /// Serializes read-modify-write of a mark and its observer
    critical: Mutex<()>,
    editor: Arc<dyn EditorManager>,
    documents: Arc<dyn DocumentObserver>,
    settings: Arc<dyn SettingsStore>,
    dispatcher: UiDispatcher,
}

/// Preview marks for open files.
///
/// Reads are immediate; `prepare_preview`, `dispose_preview` and the close
/// operations only take effect once the UI queue runs them. The `_now`
/// variants apply inline when the caller is already on the UI thread.
#[derive(Clone)]
pub struct PreviewTracker {
    state: Arc<TrackerState>,
}

impl PreviewTracker {
    pub fn new(
        editor: Arc<dyn EditorManager>,
        documents: Arc<dyn DocumentObserver>,
        settings: Arc<dyn SettingsStore>,
        dispatcher: UiDispatcher,
    ) -> Self {
        Self {
            state: Arc::new(TrackerState {
                marks: Mutex::new(HashMap::new()),
                critical: Mutex::new(()),
                editor,
                documents,
                settings,
                dispatcher,
            }),
        }
    }

    pub fn is_previewed(&self, file: Option<&FileHandle>) -> bool {
        file.is_some_and(|file| self.state.marks.lock().contains_key(file))
    }

    pub fn previewed_files(&self) -> Vec<FileHandle> {
        let mut files: Vec<FileHandle> = self.state.marks.lock().keys().cloned().collect();
        files.sort();
        files
    }

    /// The content watch attached to a preview, if any
    pub fn observer_for(&self, file: &FileHandle) -> Option<ObserverHandle> {
        self.state
            .marks
            .lock()
            .get(file)
            .and_then(|mark| mark.observer)
    }

    /// Mark `file` as a preview. Calling it again for a marked file changes nothing.
    pub fn prepare_preview(&self, file: Option<&FileHandle>) {
        let Some(file) = file else {
            trace!("No file to prepare as preview");
            return;
        };

        let state = self.state.clone();
        let file = file.clone();
        self.state
            .dispatcher
            .invoke_safe(move || state.apply_prepare(&file));
    }

    /// Clear the preview mark of `file`, optionally refreshing its tab presentation
    pub fn dispose_preview(&self, file: Option<&FileHandle>, update_representation: bool) {
        let Some(file) = file else {
            trace!("No file to dispose preview for");
            return;
        };

        let state = self.state.clone();
        let file = file.clone();
        self.state
            .dispatcher
            .invoke_safe(move || state.apply_dispose(&file, update_representation));
    }

    /// Turn the preview into a permanent tab without reopening it
    pub fn promote(&self, file: &FileHandle) {
        info!(file = %file, "Promoting preview to permanent editor");
        self.dispose_preview(Some(file), true);
    }

    /// Close every preview except `except`
    pub fn close_other_previews(&self, except: &FileHandle) {
        let state = self.state.clone();
        let except = except.clone();
        self.state
            .dispatcher
            .invoke_safe(move || state.apply_close_previews(Some(&except)));
    }

    pub fn close_all_previews(&self) {
        let state = self.state.clone();
        self.state
            .dispatcher
            .invoke_safe(move || state.apply_close_previews(None));
    }

    /// Close every preview and wait until it is done; used during teardown
    pub fn close_all_previews_and_wait(&self) -> bool {
        let state = self.state.clone();
        self.state
            .dispatcher
            .invoke_safe_and_wait(move || state.apply_close_previews(None))
    }

    /// Like `prepare_preview`, but applied before returning when called from a
    /// task already running on the UI thread. The mark must be in place before
    /// the editor opens the file and reports the tab switch.
    pub fn prepare_preview_now(&self, file: &FileHandle) {
        let state = self.state.clone();
        let file = file.clone();
        self.run_now_or_schedule(move || state.apply_prepare(&file));
    }

    /// Like `dispose_preview`, applied inline on the UI thread
    pub fn dispose_preview_now(&self, file: &FileHandle, update_representation: bool) {
        let state = self.state.clone();
        let file = file.clone();
        self.run_now_or_schedule(move || state.apply_dispose(&file, update_representation));
    }

    /// Like `close_other_previews`, applied inline on the UI thread
    pub fn close_other_previews_now(&self, except: &FileHandle) {
        let state = self.state.clone();
        let except = except.clone();
        self.run_now_or_schedule(move || state.apply_close_previews(Some(&except)));
    }

    fn run_now_or_schedule<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let dispatcher = &self.state.dispatcher;
        if !dispatcher.is_ui_thread() {
            dispatcher.invoke_safe(task);
        } else if dispatcher.is_valid() {
            task();
        } else {
            trace!("Workspace disposed, dropping preview mutation");
        }
    }
}

impl TrackerState {
    fn apply_prepare(&self, file: &FileHandle) {
        let _critical = self.critical.lock();

        if self.marks.lock().contains_key(file) {
            trace!(file = %file, "Already a preview");
            return;
        }

        let observer = if self.settings.open_editor_on_edit_preview() {
            self.documents.watch(file)
        } else {
            None
        };

        self.marks
            .lock()
            .insert(file.clone(), PreviewMark { observer });
        debug!(file = %file, watched = observer.is_some(), "Preview prepared");
    }

    fn apply_dispose(&self, file: &FileHandle, update_representation: bool) {
        let removed = {
            let _critical = self.critical.lock();
            let Some(mark) = self.marks.lock().remove(file) else {
                trace!(file = %file, "Not a preview, nothing to dispose");
                return;
            };
            if let Some(observer) = mark.observer {
                self.documents.unwatch(observer);
            }
            mark
        };

        debug!(file = %file, watched = removed.observer.is_some(), "Preview disposed");

        if update_representation && self.editor.is_open(file) {
            self.editor.refresh_presentation(file);
        }
    }

    fn apply_close_previews(&self, except: Option<&FileHandle>) {
        let targets: Vec<FileHandle> = self
            .marks
            .lock()
            .keys()
            .filter(|file| Some(*file) != except)
            .cloned()
            .collect();

        for file in targets {
            self.apply_dispose(&file, false);
            if self.editor.is_open(&file) {
                debug!(file = %file, "Closing preview tab");
                self.editor.close_file(&file);
            }
        }
    }
}

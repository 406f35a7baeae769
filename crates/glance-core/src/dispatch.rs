// ABOUTME: UI-affinity execution: a task queue owned by one thread plus liveness-checked dispatch
// ABOUTME: Events may arrive on any thread; mutations always run where the queue is drained

use glance_logging::{trace, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, ThreadId};
use tokio::sync::{mpsc, oneshot};

use crate::capabilities::Workspace;

pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Executor bound to the UI thread
pub trait UiExecutor: Send + Sync {
    /// Queue `task` to run later on the UI thread
    fn post(&self, task: UiTask);

    fn is_ui_thread(&self) -> bool;
}

/// FIFO task queue owned by the thread that created it.
///
/// The host drains it from its event loop with [`UiQueue::run_pending`].
/// Tasks posted while draining run in the same drain.
pub struct UiQueue {
    sender: mpsc::UnboundedSender<UiTask>,
    receiver: Mutex<mpsc::UnboundedReceiver<UiTask>>,
    ui_thread: ThreadId,
    pending: AtomicUsize,
}

impl UiQueue {
    /// Create a queue whose UI thread is the calling thread
    pub fn new() -> Arc<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        Arc::new(Self {
            sender,
            receiver: Mutex::new(receiver),
            ui_thread: thread::current().id(),
            pending: AtomicUsize::new(0),
        })
    }

    /// Run queued tasks until the queue is empty, returning how many ran.
    ///
    /// Nested calls (a task draining the queue) and calls from other threads
    /// run nothing.
    pub fn run_pending(&self) -> usize {
        if !self.is_ui_thread() {
            warn!("UI queue drained from a foreign thread, ignoring");
            return 0;
        }

        let Some(mut receiver) = self.receiver.try_lock() else {
            trace!("Nested UI queue drain ignored");
            return 0;
        };

        let mut ran = 0;
        while let Ok(task) = receiver.try_recv() {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            task();
            ran += 1;
        }
        ran
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }
}

impl UiExecutor for UiQueue {
    fn post(&self, task: UiTask) {
        self.pending.fetch_add(1, Ordering::AcqRel);
        if self.sender.send(task).is_err() {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            warn!("UI queue closed, dropping task");
        }
    }

    fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }
}

/// Dispatches work to the UI thread, but only while the workspace is alive
#[derive(Clone)]
pub struct UiDispatcher {
    executor: Arc<dyn UiExecutor>,
    workspace: Arc<dyn Workspace>,
}

impl UiDispatcher {
    pub fn new(executor: Arc<dyn UiExecutor>, workspace: Arc<dyn Workspace>) -> Self {
        Self {
            executor,
            workspace,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.workspace.is_alive()
    }

    pub fn is_ui_thread(&self) -> bool {
        self.executor.is_ui_thread()
    }

    /// Fire-and-forget: run `task` later on the UI thread if the workspace
    /// is still alive by then.
    pub fn invoke_safe<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let workspace = self.workspace.clone();
        self.executor.post(Box::new(move || {
            if workspace.is_alive() {
                task();
            } else {
                trace!("Workspace disposed, dropping queued UI task");
            }
        }));
    }

    /// Run `task` on the UI thread and wait for it. Returns whether it ran.
    ///
    /// Runs inline when called on the UI thread. From any other thread this
    /// blocks until the UI thread drains its queue, so it must not be called
    /// from async code.
    pub fn invoke_safe_and_wait<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.executor.is_ui_thread() {
            if !self.workspace.is_alive() {
                trace!("Workspace disposed, skipping UI task");
                return false;
            }
            task();
            return true;
        }

        let (done_tx, done_rx) = oneshot::channel();
        let workspace = self.workspace.clone();
        self.executor.post(Box::new(move || {
            let ran = workspace.is_alive();
            if ran {
                task();
            }
            let _ = done_tx.send(ran);
        }));

        done_rx.blocking_recv().unwrap_or(false)
    }
}

//! Execution contexts: where continuations that touch player or world state run.
//!
//! The host designates one context as authoritative (the server's main
//! thread). Teleport continuations are submitted to it instead of running on
//! whatever thread completed the relocation.

use tokio::sync::mpsc;

/// A unit of work submitted to a context.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Somewhere tasks can be sent to run.
pub trait ExecutionContext: Send + Sync {
    fn execute(&self, task: Task);
}

/// Runs every task immediately on the submitting thread.
///
/// For hosts where the caller is already on the authoritative thread, and for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineContext;

impl ExecutionContext for InlineContext {
    fn execute(&self, task: Task) {
        task();
    }
}

/// Queue of tasks drained by the server tick.
///
/// `handle()` gives out cloneable submitters; `run_pending()` runs queued
/// tasks in submission order on the thread that owns the queue.
pub struct MainThreadQueue {
    sender: mpsc::UnboundedSender<Task>,
    receiver: mpsc::UnboundedReceiver<Task>,
}

/// Cloneable submitter for a `MainThreadQueue`.
#[derive(Debug, Clone)]
pub struct MainThread {
    sender: mpsc::UnboundedSender<Task>,
}

impl MainThreadQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn handle(&self) -> MainThread {
        MainThread {
            sender: self.sender.clone(),
        }
    }

    /// Run every task queued so far. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Wait for the next task and run it. Never returns false while the
    /// queue itself holds a sender.
    pub async fn run_next(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for MainThreadQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext for MainThread {
    fn execute(&self, task: Task) {
        if self.sender.send(task).is_err() {
            tracing::debug!("main thread queue closed, dropping task");
        }
    }
}

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::{Notify, Semaphore};

/// An opaque free-text instruction describing a desired automation outcome.
/// Consumed exactly once; never retried or persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task(String);

impl Task {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self(instruction.into())
    }

    pub fn instruction(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Queue items: real work, or the distinguished shutdown sentinel that
/// tells a worker to exit its loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueItem {
    Run(Task),
    Shutdown,
}

/// Unbounded in-memory FIFO shared by the worker loops. `join` resolves
/// once every pushed item has been marked done, which is the shutdown
/// barrier: sentinels are pushed after the real tasks, so by FIFO order
/// all real work drains first.
pub struct TaskQueue {
    items: Mutex<VecDeque<QueueItem>>,
    // One permit per queued item; acquiring guarantees an item is present.
    ready: Semaphore,
    outstanding: AtomicUsize,
    all_done: Notify,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            ready: Semaphore::new(0),
            outstanding: AtomicUsize::new(0),
            all_done: Notify::new(),
        }
    }

    pub fn push(&self, task: Task) {
        self.push_item(QueueItem::Run(task));
    }

    pub fn push_shutdown(&self) {
        self.push_item(QueueItem::Shutdown);
    }

    fn push_item(&self, item: QueueItem) {
        self.items.lock().expect("queue lock").push_back(item);
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.ready.add_permits(1);
    }

    /// Blocks until an item is available and removes it in FIFO order.
    pub async fn pop(&self) -> QueueItem {
        let permit = self
            .ready
            .acquire()
            .await
            .expect("queue semaphore never closed");
        permit.forget();
        self.items
            .lock()
            .expect("queue lock")
            .pop_front()
            .expect("permit implies a queued item")
    }

    /// Marks one previously popped item as fully processed.
    pub fn task_done(&self) {
        let prev = self.outstanding.fetch_sub(1, Ordering::SeqCst);
        if prev == 1 {
            self.all_done.notify_waiters();
        }
    }

    /// Resolves once every pushed item has been marked done.
    pub async fn join(&self) {
        loop {
            let notified = self.all_done.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.outstanding.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().expect("queue lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

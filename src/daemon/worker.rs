use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::agent::runner::TaskRunner;
use crate::computer::interface::ComputerInterface;
use crate::daemon::queue::{QueueItem, TaskQueue};

/// Pause between consecutive tasks on one worker.
const POST_TASK_PAUSE: Duration = Duration::from_millis(500);
/// Backoff after a task error before the worker retries the queue.
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// One long-lived worker loop: dequeue, run to completion, repeat, until
/// the shutdown sentinel arrives. Task failures are logged and swallowed;
/// the loop never terminates on them.
pub struct Worker {
    name: String,
    queue: Arc<TaskQueue>,
    runner: Arc<dyn TaskRunner>,
    /// Shared desktop session. The lock is held for a whole task so two
    /// workers never interleave primitive calls against one desktop.
    iface: Arc<Mutex<Arc<dyn ComputerInterface>>>,
}

impl Worker {
    pub fn new(
        name: String,
        queue: Arc<TaskQueue>,
        runner: Arc<dyn TaskRunner>,
        iface: Arc<Mutex<Arc<dyn ComputerInterface>>>,
    ) -> Self {
        Self {
            name,
            queue,
            runner,
            iface,
        }
    }

    pub async fn run(self) {
        tracing::info!(worker = %self.name, "worker started");
        loop {
            match self.queue.pop().await {
                QueueItem::Shutdown => {
                    tracing::info!(worker = %self.name, "stop sentinel received");
                    self.queue.task_done();
                    break;
                }
                QueueItem::Run(task) => {
                    tracing::info!(worker = %self.name, "dequeued task");
                    let result = {
                        let iface = self.iface.lock().await;
                        self.runner.run(&self.name, iface.as_ref(), &task).await
                    };
                    self.queue.task_done();
                    match result {
                        Ok(outcome) => {
                            tracing::info!(worker = %self.name, outcome = %outcome, "task finished");
                            tokio::time::sleep(POST_TASK_PAUSE).await;
                        }
                        Err(e) => {
                            tracing::error!(worker = %self.name, error = %e, "task error");
                            tokio::time::sleep(ERROR_BACKOFF).await;
                        }
                    }
                }
            }
        }
        tracing::info!(worker = %self.name, "worker exited");
    }
}

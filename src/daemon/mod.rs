pub mod queue;
pub mod worker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::agent::runner::{AgentRunner, TaskRunner};
use crate::computer::client::HttpComputer;
use crate::computer::interface::ComputerInterface;
use crate::computer::session::Session;
use crate::config::DaemonConfig;
use crate::decision::client::AzureDecider;
use crate::errors::DeskPilotResult;

pub use queue::{Task, TaskQueue};
pub use worker::Worker;

/// The canonical chat instruction handed to the decision service.
pub fn chat_instruction(recipient: &str, message: &str) -> String {
    format!(
        "Open Microsoft Teams on the desktop, wait until the app is visible, \
         click the search box, type the name '{recipient}', select the person \
         from results, open the chat, click the message input area, type the \
         message: \"{message}\", and press Enter to send."
    )
}

/// The queue-driven automation daemon: one backend session, one task
/// queue, N cooperative worker loops on the shared runtime.
pub struct Daemon {
    config: DaemonConfig,
    queue: Arc<TaskQueue>,
    session: Option<Session>,
    workers: Vec<JoinHandle<()>>,
    running: AtomicBool,
}

impl Daemon {
    pub fn new(config: DaemonConfig) -> Self {
        Self {
            config,
            queue: Arc::new(TaskQueue::new()),
            session: None,
            workers: Vec::new(),
            running: AtomicBool::new(false),
        }
    }

    /// Connects the single backend session and spawns the worker loops.
    pub async fn start(&mut self) -> DeskPilotResult<()> {
        let backend: Arc<dyn ComputerInterface> =
            Arc::new(HttpComputer::new(&self.config.computer_url));
        let session = Session::establish(backend).await?;

        let iface = Arc::new(Mutex::new(session.interface()));
        let decider = Arc::new(AzureDecider::new(&self.config.azure));
        let runner: Arc<dyn TaskRunner> = Arc::new(AgentRunner::new(
            decider,
            self.config.max_iterations,
            self.config.trajectory_dir.clone(),
            self.config.max_recent_images,
        ));

        for i in 0..self.config.workers {
            let worker = Worker::new(
                format!("agent{}", i + 1),
                Arc::clone(&self.queue),
                Arc::clone(&runner),
                Arc::clone(&iface),
            );
            self.workers.push(tokio::spawn(worker.run()));
        }

        self.session = Some(session);
        self.running.store(true, Ordering::SeqCst);
        tracing::info!(workers = self.config.workers, "daemon started");
        Ok(())
    }

    /// Submits a task. After shutdown begins, submissions are rejected and
    /// only logged; nothing is surfaced to the caller.
    pub fn enqueue(&self, task: Task) {
        if !self.running.load(Ordering::SeqCst) {
            tracing::warn!("daemon is stopping, task not admitted");
            return;
        }
        self.queue.push(task);
        tracing::info!(pending = self.queue.len(), "task enqueued");
    }

    pub fn enqueue_chat_message(&self, recipient: &str, message: &str) {
        self.enqueue(Task::new(chat_instruction(recipient, message)));
        tracing::info!(recipient = %recipient, "chat message task enqueued");
    }

    /// Stops admitting tasks, drains the queue, waits for every worker to
    /// exit, and releases the backend session exactly once.
    pub async fn stop(&mut self) {
        tracing::info!("stopping daemon");
        self.running.store(false, Ordering::SeqCst);

        for _ in 0..self.workers.len() {
            self.queue.push_shutdown();
        }
        self.queue.join().await;

        for handle in self.workers.drain(..) {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "worker join failed");
            }
        }

        if let Some(session) = self.session.take() {
            if let Err(e) = session.disconnect().await {
                tracing::warn!(error = %e, "error during backend shutdown");
            }
        }
        tracing::info!("daemon stopped");
    }
}

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::agent::translator::{self, ACTION_SETTLE, BATCH_SETTLE};
use crate::agent::trajectory::TrajectoryStore;
use crate::computer::interface::{ComputerInterface, ScreenSize};
use crate::daemon::queue::Task;
use crate::decision::client::Decider;
use crate::decision::types::ConversationContext;
use crate::errors::DeskPilotResult;

/// Consecutive empty decisions, after at least one productive iteration,
/// taken to mean the task is finished. A heuristic: nothing verifies the
/// requested outcome actually occurred.
const EMPTY_STREAK_DONE: u32 = 2;

const FALLBACK_SCREEN: ScreenSize = ScreenSize {
    width: 1920,
    height: 1080,
};

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// The decision service stopped returning actions after making progress.
    Completed,
    /// Iteration ceiling reached; the task ended but is not confirmed done.
    Ended,
    /// The attempt could not continue (e.g. screenshots unavailable).
    Failed(String),
}

impl std::fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskOutcome::Completed => write!(f, "completed"),
            TaskOutcome::Ended => write!(f, "ended"),
            TaskOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Seam between the worker loop and task execution, so queue/worker
/// behavior is testable without a backend or decision service.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn run(
        &self,
        worker: &str,
        iface: &dyn ComputerInterface,
        task: &Task,
    ) -> DeskPilotResult<TaskOutcome>;
}

#[derive(Debug, Clone)]
pub struct SettleDelays {
    pub between_actions: Duration,
    pub after_batch: Duration,
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            between_actions: ACTION_SETTLE,
            after_batch: BATCH_SETTLE,
        }
    }
}

/// The perception loop: screenshot, ask the decision service for the next
/// actions, translate them, repeat up to the iteration ceiling.
pub struct AgentRunner {
    decider: Arc<dyn Decider>,
    max_iterations: u32,
    trajectory_base: PathBuf,
    keep_recent: usize,
    settle: SettleDelays,
}

impl AgentRunner {
    pub fn new(
        decider: Arc<dyn Decider>,
        max_iterations: u32,
        trajectory_base: PathBuf,
        keep_recent: usize,
    ) -> Self {
        Self {
            decider,
            max_iterations,
            trajectory_base,
            keep_recent,
            settle: SettleDelays::default(),
        }
    }

    pub fn with_settle(mut self, settle: SettleDelays) -> Self {
        self.settle = settle;
        self
    }

    pub async fn run_task(
        &self,
        worker: &str,
        iface: &dyn ComputerInterface,
        task: &Task,
    ) -> DeskPilotResult<TaskOutcome> {
        // Fresh conversation per task attempt.
        let mut ctx = ConversationContext::new();
        let mut store = TrajectoryStore::create(&self.trajectory_base, self.keep_recent)?;

        let screen = match iface.get_screen_size().await {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!(worker, error = %e, "screen size probe failed, assuming 1920x1080");
                FALLBACK_SCREEN
            }
        };

        tracing::info!(
            worker,
            run_id = %store.run_id(),
            instruction = %task.instruction(),
            "running task"
        );

        let mut empty_streak = 0u32;
        let mut productive = false;

        for iteration in 1..=self.max_iterations {
            let png = match iface.screenshot().await {
                Ok(png) => png,
                Err(e) => {
                    tracing::error!(worker, iteration, error = %e, "screenshot failed, stopping task");
                    return Ok(TaskOutcome::Failed(format!("screenshot failed: {e}")));
                }
            };
            if let Err(e) = store.save_screenshot(worker, iteration, &png) {
                tracing::warn!(worker, iteration, error = %e, "failed to save screenshot");
            }

            // A decision-service error is absorbed as "no actions this
            // iteration"; the loop itself never retries the call.
            let descriptors = match self
                .decider
                .decide(&mut ctx, task.instruction(), &png, screen)
                .await
            {
                Ok(descriptors) => descriptors,
                Err(e) => {
                    tracing::warn!(worker, iteration, error = %e, "decision call failed, no actions this iteration");
                    Vec::new()
                }
            };

            if descriptors.is_empty() {
                empty_streak += 1;
                tracing::info!(worker, iteration, empty_streak, "no actions returned");
                if productive && empty_streak >= EMPTY_STREAK_DONE {
                    tracing::info!(worker, iteration, "task treated as complete");
                    return Ok(TaskOutcome::Completed);
                }
                tokio::time::sleep(self.settle.after_batch).await;
                continue;
            }
            empty_streak = 0;
            productive = true;

            for desc in &descriptors {
                if let Err(e) = translator::execute_descriptor(iface, desc).await {
                    tracing::warn!(worker, iteration, kind = %desc.kind, error = %e, "primitive failed, skipping action");
                } else if let Err(e) = store.log_action(iteration, &desc.params) {
                    tracing::warn!(worker, iteration, error = %e, "failed to log action");
                }
                tokio::time::sleep(self.settle.between_actions).await;
            }
            tokio::time::sleep(self.settle.after_batch).await;
        }

        tracing::info!(worker, max_iterations = self.max_iterations, "iteration ceiling reached");
        Ok(TaskOutcome::Ended)
    }
}

#[async_trait]
impl TaskRunner for AgentRunner {
    async fn run(
        &self,
        worker: &str,
        iface: &dyn ComputerInterface,
        task: &Task,
    ) -> DeskPilotResult<TaskOutcome> {
        self.run_task(worker, iface, task).await
    }
}

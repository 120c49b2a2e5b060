//! Runs a single LLM-directed chat task end to end and exits. Recipient and
//! message come from DESKPILOT_RECIPIENT / DESKPILOT_MESSAGE.

use std::sync::Arc;

use deskpilot::agent::runner::{AgentRunner, TaskOutcome};
use deskpilot::computer::client::HttpComputer;
use deskpilot::computer::interface::ComputerInterface;
use deskpilot::computer::session::with_session;
use deskpilot::config::DaemonConfig;
use deskpilot::daemon::{chat_instruction, Task};
use deskpilot::decision::client::AzureDecider;
use deskpilot::errors::DeskPilotResult;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = dotenvy::dotenv();
    deskpilot::init_tracing();

    match run().await {
        Ok(outcome) => tracing::info!(outcome = %outcome, "automation finished"),
        Err(e) => {
            tracing::error!(error = %e, "automation failed");
            std::process::exit(1);
        }
    }
}

async fn run() -> DeskPilotResult<TaskOutcome> {
    let config = DaemonConfig::from_env()?;

    let recipient =
        std::env::var("DESKPILOT_RECIPIENT").unwrap_or_else(|_| "John Doe".to_string());
    let message = std::env::var("DESKPILOT_MESSAGE")
        .unwrap_or_else(|_| "Hello, this is an automated test message!".to_string());

    let decider = Arc::new(AzureDecider::new(&config.azure));
    let runner = AgentRunner::new(
        decider,
        config.max_iterations,
        config.trajectory_dir.clone(),
        config.max_recent_images,
    );
    let task = Task::new(chat_instruction(&recipient, &message));

    let backend: Arc<dyn ComputerInterface> = Arc::new(HttpComputer::new(&config.computer_url));
    with_session(backend, |iface| async move {
        runner.run_task("send-once", iface.as_ref(), &task).await
    })
    .await
}

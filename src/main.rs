use deskpilot::config::DaemonConfig;
use deskpilot::daemon::Daemon;
use deskpilot::errors::DeskPilotResult;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = dotenvy::dotenv();
    deskpilot::init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "daemon crashed");
        std::process::exit(1);
    }
}

async fn run() -> DeskPilotResult<()> {
    let config = DaemonConfig::from_env()?;
    let mut daemon = Daemon::new(config);
    daemon.start().await?;

    // Optional startup task, mirroring a caller that enqueues over IPC.
    if let (Ok(recipient), Ok(message)) = (
        std::env::var("DESKPILOT_DEMO_RECIPIENT"),
        std::env::var("DESKPILOT_DEMO_MESSAGE"),
    ) {
        daemon.enqueue_chat_message(&recipient, &message);
    }

    tracing::info!("daemon running, press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;
    tracing::info!("termination signal received");

    daemon.stop().await;
    Ok(())
}

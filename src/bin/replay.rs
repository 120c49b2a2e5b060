//! Replays the calibrated send sequence with no LLM involvement. The
//! target application must be open and positioned as it was at
//! calibration time.

use std::sync::Arc;

use deskpilot::computer::client::HttpComputer;
use deskpilot::computer::interface::ComputerInterface;
use deskpilot::computer::session::with_session;
use deskpilot::config;
use deskpilot::errors::{DeskPilotError, DeskPilotResult};
use deskpilot::replay::coords::CoordinateMap;
use deskpilot::replay::sequence::send_sequence;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = dotenvy::dotenv();
    deskpilot::init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "replay failed");
        std::process::exit(1);
    }
}

async fn run() -> DeskPilotResult<()> {
    let recipient = std::env::var("DESKPILOT_RECIPIENT").map_err(|_| {
        DeskPilotError::Config("DESKPILOT_RECIPIENT must be set for replay".into())
    })?;
    let message = std::env::var("DESKPILOT_MESSAGE")
        .unwrap_or_else(|_| "Hello from deskpilot!".to_string());

    let map = CoordinateMap::load(&config::coords_file())?;
    if map.is_empty() {
        return Err(DeskPilotError::Config(
            "no coordinates calibrated, run the calibrate tool first".into(),
        ));
    }

    let backend: Arc<dyn ComputerInterface> = Arc::new(HttpComputer::new(&config::computer_url()));
    with_session(backend, |iface| async move {
        send_sequence(iface.as_ref(), &map, recipient.trim(), message.trim()).await
    })
    .await
}

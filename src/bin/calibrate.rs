//! Operator tool: walks through the named anchors, captures the live
//! cursor position for each after a settle delay, and persists the map.
//! Set DESKPILOT_CLEAR=1 to remove the stored map instead.

use std::io::Write as _;
use std::sync::Arc;

use deskpilot::computer::client::HttpComputer;
use deskpilot::computer::interface::ComputerInterface;
use deskpilot::computer::session::with_session;
use deskpilot::config;
use deskpilot::errors::DeskPilotResult;
use deskpilot::replay::coords::{CoordinateMap, ANCHOR_TARGETS};
use deskpilot::replay::sequence::capture_anchor;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = dotenvy::dotenv();
    deskpilot::init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "calibration failed");
        std::process::exit(1);
    }
}

async fn run() -> DeskPilotResult<()> {
    let path = config::coords_file();

    if std::env::var("DESKPILOT_CLEAR").is_ok() {
        CoordinateMap::clear(&path)?;
        return Ok(());
    }

    let backend: Arc<dyn ComputerInterface> = Arc::new(HttpComputer::new(&config::computer_url()));
    with_session(backend, |iface| async move {
        let mut map = CoordinateMap::load(&path)?;

        for (name, description) in ANCHOR_TARGETS {
            print!(
                "Hover the cursor over the {description}, then press Enter \
                 (type 'skip' to keep the current value): "
            );
            std::io::stdout().flush()?;
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            if line.trim().eq_ignore_ascii_case("skip") {
                continue;
            }

            println!("Capturing '{name}' in 3 seconds, keep the cursor in place...");
            let point = capture_anchor(iface.as_ref()).await?;
            map.set(name, point);
            map.save(&path)?;
            println!("Captured {name}: ({}, {})", point.x, point.y);
        }

        Ok(())
    })
    .await
}

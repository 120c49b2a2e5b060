//! Backend sanity check: connect, save a screenshot, log the screen size,
//! issue one click in a safe corner, disconnect.

use std::path::Path;
use std::sync::Arc;

use deskpilot::computer::client::HttpComputer;
use deskpilot::computer::interface::ComputerInterface;
use deskpilot::computer::session::with_session;
use deskpilot::config;
use deskpilot::errors::DeskPilotResult;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = dotenvy::dotenv();
    deskpilot::init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "host check failed");
        std::process::exit(1);
    }
}

async fn run() -> DeskPilotResult<()> {
    let backend: Arc<dyn ComputerInterface> = Arc::new(HttpComputer::new(&config::computer_url()));
    with_session(backend, |iface| async move {
        let png = iface.screenshot().await?;
        let out = Path::new("output");
        std::fs::create_dir_all(out)?;
        let path = out.join("screenshot.png");
        std::fs::write(&path, &png)?;
        tracing::info!(path = %path.display(), bytes = png.len(), "screenshot saved");

        let size = iface.get_screen_size().await?;
        tracing::info!(width = size.width, height = size.height, "screen size");

        // Input sanity in a safe corner.
        iface.move_cursor(50, 50).await?;
        iface.left_click(50, 50).await?;
        tracing::info!("input sanity check issued");

        Ok(())
    })
    .await
}

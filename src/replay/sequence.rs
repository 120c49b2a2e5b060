use std::time::Duration;

use crate::computer::interface::{ComputerInterface, Point};
use crate::errors::DeskPilotResult;
use crate::replay::coords::{CoordinateMap, FIRST_RESULT, MESSAGE_BOX, SEARCH_BOX};

/// Delay between the operator confirming an anchor and the cursor capture,
/// so they can move the mouse into place.
pub const CALIBRATION_SETTLE: Duration = Duration::from_secs(3);

/// Captures the live cursor position after the settle delay.
pub async fn capture_anchor(iface: &dyn ComputerInterface) -> DeskPilotResult<Point> {
    tokio::time::sleep(CALIBRATION_SETTLE).await;
    iface.get_cursor_position().await
}

/// Replays the fixed send sequence against calibrated anchors: search,
/// select recipient, type the message, Enter. No decision service involved
/// and no verification that the message actually went out; the sleeps are
/// the only synchronization with the target application.
///
/// Required anchors are checked up front so nothing is injected into a
/// half-calibrated desktop.
pub async fn send_sequence(
    iface: &dyn ComputerInterface,
    map: &CoordinateMap,
    recipient: &str,
    message: &str,
) -> DeskPilotResult<()> {
    let search = map.require(SEARCH_BOX)?;
    let message_box = map.require(MESSAGE_BOX)?;

    tracing::info!(recipient = %recipient, "replaying send sequence");

    iface.left_click(search.x, search.y).await?;
    iface.hotkey(&["ctrl", "a"]).await?;
    iface.press_key("backspace").await?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    iface.type_text(recipient).await?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    iface.press_key("enter").await?;
    tokio::time::sleep(Duration::from_secs(1)).await;

    if let Some(first) = map.get(FIRST_RESULT) {
        iface.left_click(first.x, first.y).await?;
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    iface.left_click(message_box.x, message_box.y).await?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    iface.type_text(message).await?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    iface.press_key("enter").await?;
    tokio::time::sleep(Duration::from_millis(500)).await;

    tracing::info!("send sequence issued");
    Ok(())
}

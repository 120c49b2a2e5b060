use std::time::Duration;

use crate::agent::action::Action;
use crate::computer::interface::ComputerInterface;
use crate::decision::types::ActionDescriptor;
use crate::errors::DeskPilotResult;

/// Fixed pause after each primitive so the target UI can settle. The only
/// synchronization mechanism; nothing polls for an observable signal.
pub const ACTION_SETTLE: Duration = Duration::from_secs(1);
/// Fixed pause after a whole batch of actions, before the next screenshot.
pub const BATCH_SETTLE: Duration = Duration::from_secs(2);

/// Translates one raw descriptor into a primitive call. Unknown kinds are
/// logged and ignored, never an error.
pub async fn execute_descriptor(
    iface: &dyn ComputerInterface,
    desc: &ActionDescriptor,
) -> DeskPilotResult<()> {
    let Some(action) = Action::from_descriptor(desc) else {
        tracing::warn!(kind = %desc.kind, "unknown action kind, ignoring");
        return Ok(());
    };
    execute_action(iface, &action).await
}

/// Issues one typed action against the backend and returns once accepted.
/// Fire-and-forget: no postcondition is verified.
pub async fn execute_action(iface: &dyn ComputerInterface, action: &Action) -> DeskPilotResult<()> {
    match action {
        Action::Click { x, y, button } => {
            if button != "left" {
                tracing::warn!(button = %button, "backend only injects left clicks, using left");
            }
            tracing::info!(x, y, "click");
            iface.left_click(*x, *y).await
        }
        Action::Type { text } => {
            tracing::info!(chars = text.len(), "type text");
            iface.type_text(text).await
        }
        Action::Scroll { x, y, scroll_x, scroll_y } => {
            tracing::info!(x, y, scroll_x, scroll_y, "scroll");
            iface.scroll(*x, *y, *scroll_x, *scroll_y).await
        }
        Action::KeyPress { keys } => {
            for key in keys {
                tracing::info!(key = %key, "press key");
                iface.press_key(&key.to_lowercase()).await?;
            }
            Ok(())
        }
        Action::Wait { ms } => {
            tracing::info!(ms, "wait");
            tokio::time::sleep(Duration::from_millis(*ms)).await;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::computer::mock::RecordingComputer;
    use serde_json::json;

    #[tokio::test]
    async fn unknown_kind_is_ignored_without_error() {
        let iface = RecordingComputer::new();
        let desc = ActionDescriptor::new("levitate", json!({}));
        execute_descriptor(&iface, &desc).await.unwrap();
        assert!(iface.calls().is_empty());
    }

    #[tokio::test]
    async fn click_reaches_backend_with_coordinates() {
        let iface = RecordingComputer::new();
        let desc = ActionDescriptor::new("click", json!({ "x": 813, "y": 1046 }));
        execute_descriptor(&iface, &desc).await.unwrap();
        assert_eq!(iface.calls(), vec!["left_click(813,1046)"]);
    }

    #[tokio::test]
    async fn non_left_button_falls_back_to_left_click() {
        let iface = RecordingComputer::new();
        let desc = ActionDescriptor::new("click", json!({ "x": 5, "y": 6, "button": "right" }));
        execute_descriptor(&iface, &desc).await.unwrap();
        assert_eq!(iface.calls(), vec!["left_click(5,6)"]);
    }

    #[tokio::test]
    async fn keypress_presses_each_key_lowercased() {
        let iface = RecordingComputer::new();
        let desc = ActionDescriptor::new("keypress", json!({ "keys": ["Enter"] }));
        execute_descriptor(&iface, &desc).await.unwrap();
        assert_eq!(iface.calls(), vec!["press_key(enter)"]);
    }
}

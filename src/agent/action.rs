use serde::{Deserialize, Serialize};

use crate::decision::types::ActionDescriptor;

const DEFAULT_WAIT_MS: u64 = 2000;

/// One primitive UI operation. Produced per iteration from the raw service
/// descriptors, consumed immediately by the translator, never stored past
/// the iteration except in the trajectory log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Click { x: i32, y: i32, button: String },
    Type { text: String },
    Scroll { x: i32, y: i32, scroll_x: i32, scroll_y: i32 },
    KeyPress { keys: Vec<String> },
    Wait { ms: u64 },
}

impl Action {
    /// Typed view of a raw descriptor. Omitted fields take the documented
    /// defaults (button "left", wait 2000 ms, coordinates 0). An
    /// unrecognized kind yields `None`; the caller decides to skip it.
    pub fn from_descriptor(desc: &ActionDescriptor) -> Option<Action> {
        let p = &desc.params;
        match desc.kind.as_str() {
            "click" => Some(Action::Click {
                x: p["x"].as_i64().unwrap_or(0) as i32,
                y: p["y"].as_i64().unwrap_or(0) as i32,
                button: p["button"].as_str().unwrap_or("left").to_string(),
            }),
            "type" => Some(Action::Type {
                text: p["text"].as_str().unwrap_or("").to_string(),
            }),
            "scroll" => Some(Action::Scroll {
                x: p["x"].as_i64().unwrap_or(0) as i32,
                y: p["y"].as_i64().unwrap_or(0) as i32,
                scroll_x: p["scroll_x"].as_i64().unwrap_or(0) as i32,
                scroll_y: p["scroll_y"].as_i64().unwrap_or(0) as i32,
            }),
            "keypress" => Some(Action::KeyPress {
                keys: p["keys"]
                    .as_array()
                    .map(|keys| {
                        keys.iter()
                            .filter_map(|k| k.as_str())
                            .map(|k| k.to_string())
                            .collect()
                    })
                    .unwrap_or_default(),
            }),
            "wait" => Some(Action::Wait {
                ms: p["ms"].as_u64().unwrap_or(DEFAULT_WAIT_MS),
            }),
            _ => None,
        }
    }
}

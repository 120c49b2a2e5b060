pub mod coords;
pub mod sequence;

pub use coords::{CoordinateMap, ANCHOR_TARGETS, FIRST_RESULT, MESSAGE_BOX, SEARCH_BOX};
pub use sequence::{capture_anchor, send_sequence, CALIBRATION_SETTLE};

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::computer::interface::Point;
use crate::errors::{DeskPilotError, DeskPilotResult};

pub const SEARCH_BOX: &str = "search_box";
pub const FIRST_RESULT: &str = "first_result";
pub const MESSAGE_BOX: &str = "message_box";

/// Anchors the calibration tool walks through, with operator-facing hints.
/// `first_result` may be skipped; the send sequence works without it.
pub const ANCHOR_TARGETS: &[(&str, &str)] = &[
    (SEARCH_BOX, "search box at the top of the app"),
    (FIRST_RESULT, "first search result (optional)"),
    (MESSAGE_BOX, "message input area"),
];

/// Named screen positions captured during calibration. Valid only as long
/// as the target window has not moved since capture; nothing checks
/// staleness against the current screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMap {
    #[serde(default)]
    anchors: BTreeMap<String, Point>,
}

impl CoordinateMap {
    /// Loads the map, treating a missing file as an empty map.
    pub fn load(path: &Path) -> DeskPilotResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Persists the whole map; recalibrating an anchor overwrites its
    /// previous value on the next save.
    pub fn save(&self, path: &Path) -> DeskPilotResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), anchors = self.anchors.len(), "coordinate map saved");
        Ok(())
    }

    /// Removes the persisted map entirely.
    pub fn clear(path: &Path) -> DeskPilotResult<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
            tracing::info!(path = %path.display(), "coordinate map cleared");
        }
        Ok(())
    }

    pub fn set(&mut self, name: &str, point: Point) {
        self.anchors.insert(name.to_string(), point);
    }

    pub fn get(&self, name: &str) -> Option<Point> {
        self.anchors.get(name).copied()
    }

    pub fn require(&self, name: &str) -> DeskPilotResult<Point> {
        self.get(name).ok_or_else(|| {
            DeskPilotError::Config(format!("anchor '{name}' is not calibrated"))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_reload_round_trips_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anchors.toml");

        let mut map = CoordinateMap::default();
        map.set("a", Point { x: 10, y: 20 });
        map.set("b", Point { x: 30, y: 40 });
        map.save(&path).unwrap();

        let reloaded = CoordinateMap::load(&path).unwrap();
        assert_eq!(reloaded, map);
        assert_eq!(reloaded.get("a"), Some(Point { x: 10, y: 20 }));
        assert_eq!(reloaded.get("b"), Some(Point { x: 30, y: 40 }));
    }

    #[test]
    fn recalibration_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anchors.toml");

        let mut map = CoordinateMap::default();
        map.set(SEARCH_BOX, Point { x: 1, y: 1 });
        map.save(&path).unwrap();

        map.set(SEARCH_BOX, Point { x: 45, y: 95 });
        map.save(&path).unwrap();

        let reloaded = CoordinateMap::load(&path).unwrap();
        assert_eq!(reloaded.get(SEARCH_BOX), Some(Point { x: 45, y: 95 }));
    }

    #[test]
    fn missing_file_loads_as_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let map = CoordinateMap::load(&dir.path().join("absent.toml")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anchors.toml");

        let mut map = CoordinateMap::default();
        map.set(MESSAGE_BOX, Point { x: 5, y: 5 });
        map.save(&path).unwrap();

        CoordinateMap::clear(&path).unwrap();
        assert!(!path.exists());
        // Clearing an already-absent file is not an error.
        CoordinateMap::clear(&path).unwrap();
    }
}

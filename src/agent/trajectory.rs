use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::DeskPilotResult;

/// On-disk audit trail for one automation run: a per-run directory of
/// timestamp-qualified screenshots plus a JSONL action log. Filenames carry
/// the worker name, UTC timestamp, and iteration number, so concurrent
/// writers never collide and writes stay append-only.
pub struct TrajectoryStore {
    dir: PathBuf,
    run_id: String,
    keep_recent: usize,
    saved: VecDeque<PathBuf>,
}

impl TrajectoryStore {
    /// Creates `{base}/{run_id}` for a fresh run. `keep_recent` bounds how
    /// many screenshots remain on disk (0 means unlimited).
    pub fn create(base: &Path, keep_recent: usize) -> DeskPilotResult<Self> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let dir = base.join(&run_id);
        std::fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "trajectory directory created");
        Ok(Self {
            dir,
            run_id,
            keep_recent,
            saved: VecDeque::new(),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save_screenshot(
        &mut self,
        worker: &str,
        iteration: u32,
        png: &[u8],
    ) -> DeskPilotResult<PathBuf> {
        let ts = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
        let path = self.dir.join(format!("{worker}_{ts}_iter{iteration}.png"));
        std::fs::write(&path, png)?;
        tracing::debug!(path = %path.display(), "screenshot saved");
        self.saved.push_back(path.clone());
        self.prune();
        Ok(path)
    }

    /// Appends one executed action to the run's JSONL log. Failures here are
    /// the caller's to log; the trajectory is audit data, never load-bearing.
    pub fn log_action(&self, iteration: u32, action: &serde_json::Value) -> DeskPilotResult<()> {
        let entry = serde_json::json!({
            "ts": chrono::Utc::now().timestamp_millis(),
            "iteration": iteration,
            "action": action,
        });
        let line = serde_json::to_string(&entry)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join("trajectory.jsonl"))?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    fn prune(&mut self) {
        if self.keep_recent == 0 {
            return;
        }
        while self.saved.len() > self.keep_recent {
            if let Some(old) = self.saved.pop_front() {
                if let Err(e) = std::fs::remove_file(&old) {
                    tracing::warn!(path = %old.display(), error = %e, "failed to prune screenshot");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retains_only_most_recent_screenshots() {
        let base = tempfile::tempdir().unwrap();
        let mut store = TrajectoryStore::create(base.path(), 2).unwrap();

        for i in 1..=4 {
            store.save_screenshot("agent1", i, b"png").unwrap();
        }

        let pngs = std::fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "png"))
            .count();
        assert_eq!(pngs, 2);
    }

    #[test]
    fn zero_retention_keeps_everything() {
        let base = tempfile::tempdir().unwrap();
        let mut store = TrajectoryStore::create(base.path(), 0).unwrap();

        for i in 1..=3 {
            store.save_screenshot("agent1", i, b"png").unwrap();
        }

        let pngs = std::fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .count();
        assert_eq!(pngs, 3);
    }

    #[test]
    fn action_log_appends_jsonl() {
        let base = tempfile::tempdir().unwrap();
        let store = TrajectoryStore::create(base.path(), 3).unwrap();

        store
            .log_action(1, &serde_json::json!({ "type": "click" }))
            .unwrap();
        store
            .log_action(2, &serde_json::json!({ "type": "type" }))
            .unwrap();

        let log = std::fs::read_to_string(store.dir().join("trajectory.jsonl")).unwrap();
        assert_eq!(log.lines().count(), 2);
    }
}

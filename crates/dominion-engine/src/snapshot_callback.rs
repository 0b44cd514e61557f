//! Turn callback that writes a JSON record of every turn to disk.
//!
//! Each completed turn produces `turn_NNNN.json` in the configured
//! directory, holding the turn's event log and the post-turn
//! [`GameSnapshot`]. Visualizers replay a match from these files.

use std::path::{Path, PathBuf};

use dominion_core::runner::TurnCallback;
use dominion_core::snapshot::snapshot;
use dominion_core::{GameState, TurnReport};
use dominion_types::{GameSnapshot, TurnEvent};
use serde::Serialize;
use tracing::{debug, warn};

/// One turn as written to disk.
#[derive(Debug, Serialize)]
struct TurnRecord<'a> {
    turn: u64,
    events: &'a [TurnEvent],
    snapshot: GameSnapshot,
}

/// Callback that persists a snapshot after every turn.
pub struct SnapshotCallback {
    dir: PathBuf,
}

impl SnapshotCallback {
    /// Write records into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn create(dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, turn: u64) -> PathBuf {
        self.dir.join(format!("turn_{turn:04}.json"))
    }

    fn write(&self, report: &TurnReport, state: &GameState) -> Result<PathBuf, String> {
        let record = TurnRecord {
            turn: report.turn,
            events: &report.events,
            snapshot: snapshot(state),
        };
        let json = serde_json::to_string_pretty(&record).map_err(|e| e.to_string())?;
        let path = self.path_for(report.turn);
        std::fs::write(&path, json).map_err(|e| e.to_string())?;
        Ok(path)
    }
}

impl TurnCallback for SnapshotCallback {
    fn on_turn(&mut self, report: &TurnReport, state: &GameState) {
        // A failed write loses one record, not the game.
        match self.write(report, state) {
            Ok(path) => debug!(turn = report.turn, path = %path.display(), "Snapshot written"),
            Err(error) => warn!(turn = report.turn, error, "Failed to write snapshot"),
        }
    }
}

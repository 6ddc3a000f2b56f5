//! Best-score storage
//!
//! The only state that outlives a session is the best score, kept as a small
//! JSON document next to wherever the player points `--high-score-file`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;

/// On-disk layout of the best-score file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub best_score: u32,
}

/// Reads and writes the best score at a fixed path
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
    best: u32,
}

impl HighScoreStore {
    /// Open the store, reading the current best.
    ///
    /// A missing file counts as a best of zero. A file that exists but cannot
    /// be parsed is an error so a typo never silently wipes a record.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let best = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str::<HighScoreRecord>(&json)?.best_score,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no best-score file yet");
                0
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, best })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Persist `score` if it beats the stored best. Returns true when written.
    pub fn record(&mut self, score: u32) -> Result<bool> {
        if score <= self.best {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&HighScoreRecord { best_score: score })?;
        std::fs::write(&self.path, json)?;

        info!(previous = self.best, best = score, "new best score");
        self.best = score;
        Ok(true)
    }
}

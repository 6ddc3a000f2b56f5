//! Feedback cues derived from tick outcomes.
//!
//! The engine never plays anything itself. A cue is what a sound or visual
//! collaborator should react with; [`CuePlayer`] is the terminal stand-in that
//! rings the bell.

use std::io::Write;

use crate::game::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    None,
    Eat,
    LevelUp,
    GameOver,
    Pause,
}

impl Cue {
    /// Pick the cue for `outcome`, given the level before the tick
    pub fn for_outcome(outcome: Outcome, previous_level: u32) -> Cue {
        match outcome {
            Outcome::Ate { level, .. } if level > previous_level => Cue::LevelUp,
            Outcome::Ate { .. } => Cue::Eat,
            Outcome::Won { .. } => Cue::LevelUp,
            Outcome::Collided(_) => Cue::GameOver,
            Outcome::Moved | Outcome::Idle => Cue::None,
        }
    }

    /// Number of bell rings used to tell cues apart on a terminal
    pub fn bell_count(self) -> usize {
        match self {
            Cue::None => 0,
            Cue::Eat | Cue::Pause => 1,
            Cue::LevelUp | Cue::GameOver => 2,
        }
    }
}

/// Plays cues as terminal bells. Muted players swallow everything.
pub struct CuePlayer<W: Write> {
    out: W,
    muted: bool,
}

impl<W: Write> CuePlayer<W> {
    pub fn new(out: W, muted: bool) -> Self {
        Self { out, muted }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn play(&mut self, cue: Cue) -> std::io::Result<()> {
        if self.muted || cue == Cue::None {
            return Ok(());
        }
        for _ in 0..cue.bell_count() {
            self.out.write_all(b"\x07")?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

//! Grid Snake - a terminal Snake game
//!
//! This library provides:
//! - Core game logic: the grid motion engine, scoring and config (game module)
//! - Feedback cues derived from tick outcomes (feedback module)
//! - Best-score persistence (persistence module)
//! - TUI rendering, keyboard input and the interactive driver (render, input, modes)

pub mod error;
pub mod feedback;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
pub mod telemetry;

pub use error::{Error, Result};

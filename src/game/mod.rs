//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine is a pure state machine; whoever owns it decides when to tick.

pub mod config;
pub mod direction;
pub mod engine;
pub mod scoring;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GridMotionEngine, Outcome};
pub use state::{Cell, CollisionKind, Phase, Snake};

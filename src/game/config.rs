use serde::{Deserialize, Serialize};
use std::path::Path;

use super::state::Cell;
use crate::error::{Error, Result};

/// Largest grid edge accepted by [`GameConfig::validate`]
pub const MAX_GRID_EDGE: usize = 200;

/// Largest per-food award accepted by [`GameConfig::validate`].
/// A full 200x200 grid at this rate still fits in a `u32` score.
pub const MAX_POINTS_PER_FOOD: u32 = 100_000;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Cell the snake starts on after every reset
    pub origin: Cell,

    // Scoring
    /// Points awarded per food eaten
    pub points_per_food: u32,
    /// Points needed to climb one level
    pub points_per_level: u32,

    // Pacing, in milliseconds
    /// Tick interval at level 1
    pub base_interval_ms: u64,
    /// How much faster each level ticks
    pub interval_step_ms: u64,
    /// Floor for the tick interval
    pub min_interval_ms: u64,

    /// Fixed RNG seed for food placement; random when unset
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            origin: Cell::new(10, 10),
            points_per_food: 10,
            points_per_level: 50,
            base_interval_ms: 150,
            interval_step_ms: 10,
            min_interval_ms: 50,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size.
    ///
    /// The origin is moved to the grid centre when the default one no longer fits.
    pub fn new(width: usize, height: usize) -> Self {
        Self::default().with_size(width, height)
    }

    /// Resize the grid, keeping the origin when it still fits
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        if !self.contains(self.origin) {
            self.origin = Cell::new((width / 2) as i32, (height / 2) as i32);
        }
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Total number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Check if a cell lies within the grid
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.grid_width
            && (cell.y as usize) < self.grid_height
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_width < 2 || self.grid_height < 2 {
            return Err(Error::InvalidConfig(format!(
                "grid must be at least 2x2, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.grid_width > MAX_GRID_EDGE || self.grid_height > MAX_GRID_EDGE {
            return Err(Error::InvalidConfig(format!(
                "grid edges are capped at {MAX_GRID_EDGE}, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if !self.contains(self.origin) {
            return Err(Error::InvalidConfig(format!(
                "origin ({}, {}) lies outside the grid",
                self.origin.x, self.origin.y
            )));
        }
        if self.points_per_food == 0 || self.points_per_food > MAX_POINTS_PER_FOOD {
            return Err(Error::InvalidConfig(format!(
                "points_per_food must be in 1..={MAX_POINTS_PER_FOOD}, got {}",
                self.points_per_food
            )));
        }
        if self.points_per_level == 0 {
            return Err(Error::InvalidConfig(
                "points_per_level must be positive".to_string(),
            ));
        }
        if self.min_interval_ms == 0 || self.min_interval_ms > self.base_interval_ms {
            return Err(Error::InvalidConfig(format!(
                "min_interval_ms must be in 1..={}",
                self.base_interval_ms
            )));
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::grid::Grid;

/// Largest accepted grid dimension
pub const MAX_GRID_DIMENSION: usize = 4096;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,

    // Speed (all in milliseconds)
    /// Move period at the start of every game
    pub initial_move_period_ms: u64,
    /// The move period never drops below this
    pub min_move_period_ms: u64,
    /// Speed-up applied for each food eaten
    pub food_speedup_ms: u64,
    /// Speed-up applied when an escalation check finds no score progress
    pub stall_speedup_ms: u64,
    /// Interval between escalation checks
    pub escalation_period_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 32,
            grid_height: 24,
            initial_move_period_ms: 150,
            min_move_period_ms: 10,
            food_speedup_ms: 1,
            stall_speedup_ms: 5,
            escalation_period_ms: 30_000,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a JSON config file. Missing fields take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the game can be played with these parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("grid_width", self.grid_width), ("grid_height", self.grid_height)] {
            if !(1..=MAX_GRID_DIMENSION).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be in 1..={MAX_GRID_DIMENSION}, got {value}"
                )));
            }
        }

        if self.grid_width * self.grid_height < 2 {
            return Err(ConfigError::Invalid(
                "grid must have room for the snake and one food".to_string(),
            ));
        }

        if self.min_move_period_ms == 0 {
            return Err(ConfigError::Invalid(
                "min_move_period_ms must be at least 1".to_string(),
            ));
        }

        if self.min_move_period_ms > self.initial_move_period_ms {
            return Err(ConfigError::Invalid(format!(
                "min_move_period_ms ({}) cannot exceed initial_move_period_ms ({})",
                self.min_move_period_ms, self.initial_move_period_ms
            )));
        }

        if self.escalation_period_ms == 0 {
            return Err(ConfigError::Invalid(
                "escalation_period_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Grid geometry. Only meaningful for a validated config.
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width as i32, self.grid_height as i32)
    }
}

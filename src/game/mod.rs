//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The grid wraps around at every edge, so the snake only dies by running into itself.

pub mod clock;
pub mod config;
pub mod direction;
pub mod engine;
pub mod food;
pub mod grid;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use clock::GameClock;
pub use config::{ConfigError, GameConfig};
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome};
pub use grid::{Cell, Grid};
pub use snake::SnakeBody;
pub use state::{GameStatus, Scoreboard};

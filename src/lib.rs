//! Torus Snake - Snake on a grid that wraps around at every edge
//!
//! This library provides:
//! - Core game logic (game module): body, movement, food, speed and the
//!   paused / running / game over state machine
//! - Terminal input mapping (input module)
//! - TUI rendering (render module)
//! - The interactive game loop (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;

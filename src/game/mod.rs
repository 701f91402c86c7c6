//! Core game logic for the snake session
//!
//! No I/O or rendering here: a session is a plain [`GameState`] driven by a
//! [`GameEngine`] on a fixed tick.

pub mod action;
pub mod collision;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use collision::{is_near_food, is_out_of_bounds, random_food_position};
pub use config::GameConfig;
pub use engine::{GameEngine, TickOutcome};
pub use state::{Bounds, GameState, Phase, Position, Snake, display_name};

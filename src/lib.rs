//! Swipe Snake - a grid snake game behind an authentication gate
//!
//! This library provides:
//! - Core game logic driven by a fixed tick (game module)
//! - Session state and routing for the identity service (auth module)
//! - Append-only, fire-and-forget score persistence (store module)
//! - Keyboard and pan-gesture input, TUI rendering and the play loop

pub mod auth;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod store;

//! Authentication gate
//!
//! The identity service publishes an [`AuthState`] on a watch channel; the
//! gate turns the latest state into the screen that should be shown. The game
//! itself only ever sees the authenticated [`UserId`], for score attribution.

pub mod gate;
pub mod identity;

pub use gate::{AuthGate, Route, route_for};
pub use identity::{AuthState, IdentityService, UserId};

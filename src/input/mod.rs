pub mod gesture;
pub mod handler;

pub use gesture::{PanTracker, Translation};
pub use handler::{InputHandler, KeyAction, TextKey, edit_line};

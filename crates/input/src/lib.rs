//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::Command`]s. Independent of
//! any rendering layer.

pub mod map;

pub use tui_2048_types as types;

pub use map::map_key;

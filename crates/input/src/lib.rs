//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]s. There is no
//! auto-repeat handling: one key press is one action, and gravity does the rest.

pub mod map;

pub use tetris_2048_types as types;

pub use map::{handle_key_event, should_quit};

//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: the game view draws a snapshot into
//! a framebuffer and the renderer flushes it to the terminal.
//!
//! - Keep `core` deterministic and testable
//! - Numbered tiles coloured with the 2048 palette
//! - Precise control over cell aspect ratio (5 chars wide per tile by default)

pub mod fb;
pub mod game_view;
pub mod palette;
pub mod renderer;

pub use tetris_2048_core as core;
pub use tetris_2048_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};

//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the Tetris 2048 rules: falling tetrominoes whose four
//! cells are numbered tiles, vertical 2048-style merging after every lock, and
//! classic line clears. It has **zero dependencies** on UI, terminal or I/O:
//!
//! - **Deterministic**: shapes and tile values come from injectable sources;
//!   the same seed replays the same game
//! - **Testable**: every transition is a plain method call returning plain data
//! - **Portable**: the terminal front-end is just one consumer of [`Session`]
//!
//! # Module Structure
//!
//! - [`tile`]: a numbered cell
//! - [`tetromino`]: shapes on a 4x4 frame, moves, rotation, lock payload
//! - [`grid`]: collision, locking, merge fixpoint, line clears, win/loss
//! - [`session`]: current + next piece, gravity ticks, player actions
//! - [`snapshot`]: read-only copy for renderers
//! - [`rng`]: seeded LCG, shape and value sources
//! - [`config`]: grid size, win threshold, gravity interval
//! - [`error`]: contract-violation errors
//!
//! # Game Rules
//!
//! - **Spawn**: shapes are drawn uniformly from the seven tetrominoes; each tile
//!   starts at 2 or 4
//! - **Rotation**: clockwise only, about the 4x4 frame centre, no wall kicks
//! - **Merge**: after a lock, a tile merges with an equal tile directly above
//!   it (never sideways); passes repeat until nothing merges
//! - **Clear**: full rows vanish together and score the sum of their tiles
//! - **End**: a tile reaching the win threshold (2048) wins; a tile locking
//!   above the board loses
//!
//! # Example
//!
//! ```
//! use tetris_2048_core::{GameConfig, Session};
//! use tetris_2048_types::GameAction;
//!
//! let mut game = Session::new(GameConfig::default(), 12345).unwrap();
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! let event = game.take_last_event().unwrap();
//! assert_eq!(event.piece_id, 1);
//! assert!(!game.game_over());
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod tetromino;
pub mod tile;

pub use tetris_2048_types as types;

// Re-export commonly used types for convenience
pub use config::GameConfig;
pub use error::{Error, Result};
pub use grid::{Cell, Grid, LockOutcome, MergeStats};
pub use rng::{
    ShapeSequence, ShapeSource, SimpleRng, UniformShapes, ValueSequence, ValueSource,
};
pub use session::{LockEvent, Session};
pub use snapshot::{GameSnapshot, PieceTile};
pub use tetromino::{BoundedFrame, Frame, FrameRow, Tetromino};
pub use tile::Tile;

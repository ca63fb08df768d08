//! Shared types module - plain data structures and constants
//!
//! This crate defines the vocabulary used by every other crate in the workspace:
//! tetromino shapes, movement directions, player actions, board positions and
//! the default configuration values. Nothing in here has behavior beyond
//! parsing and small conversions, so it is usable from the core engine, the
//! terminal renderer and the input mapper alike.
//!
//! # Coordinates
//!
//! Board positions are `(col, row)` pairs. Columns grow left to right, rows grow
//! **upward**: row `0` is the floor of the board and row `height - 1` is the
//! topmost visible row. Rows at or above `height` are legal for a falling piece
//! that is still entering the board.
//!
//! # Default Configuration
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_GRID_HEIGHT` | 20 | Visible rows |
//! | `DEFAULT_GRID_WIDTH` | 12 | Columns |
//! | `DEFAULT_WIN_THRESHOLD` | 2048 | Tile value that wins the game |
//! | `TICK_MS` | 16 | Fixed timestep of the terminal loop (~60 FPS) |
//!
//! # Gravity Speeds
//!
//! | Speed | Interval |
//! |-------|----------|
//! | Slow | 275ms |
//! | Medium | 175ms |
//! | Fast | 100ms |
//!
//! # Examples
//!
//! ```
//! use tetris_2048_types::{Direction, Speed, DEFAULT_WIN_THRESHOLD};
//!
//! assert_eq!(Speed::from_str("fast"), Some(Speed::Fast));
//! assert_eq!(Direction::Down.delta(), (0, -1));
//!
//! assert_eq!(Speed::Medium.gravity_ms(), 175);
//! assert_eq!(DEFAULT_WIN_THRESHOLD, 2048);
//! ```

/// Default number of visible rows.
pub const DEFAULT_GRID_HEIGHT: usize = 20;

/// Default number of columns.
pub const DEFAULT_GRID_WIDTH: usize = 12;

/// Smallest accepted grid dimension (either axis).
pub const MIN_GRID_DIM: usize = 4;

/// Largest accepted grid dimension (either axis).
pub const MAX_GRID_DIM: usize = 64;

/// Tile value that ends the game with a win.
pub const DEFAULT_WIN_THRESHOLD: u32 = 2048;

/// Side length of a tetromino's local frame.
pub const FRAME_SIZE: usize = 4;

/// Values a freshly spawned tile may carry.
pub const SPAWN_VALUES: [u32; 2] = [2, 4];

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval for the slow preset.
pub const SLOW_GRAVITY_MS: u32 = 275;

/// Gravity interval for the medium preset (default).
pub const MEDIUM_GRAVITY_MS: u32 = 175;

/// Gravity interval for the fast preset.
pub const FAST_GRAVITY_MS: u32 = 100;

/// Tetromino shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    I,
    O,
    Z,
    J,
    L,
    S,
    T,
}

impl Shape {
    /// Every shape, in the order the spawn table draws from.
    pub const ALL: [Shape; 7] = [
        Shape::I,
        Shape::O,
        Shape::Z,
        Shape::J,
        Shape::L,
        Shape::S,
        Shape::T,
    ];

    /// Uppercase letter used by renderers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::I => "I",
            Shape::O => "O",
            Shape::Z => "Z",
            Shape::J => "J",
            Shape::L => "L",
            Shape::S => "S",
            Shape::T => "T",
        }
    }
}

/// Unit translation directions for a falling piece.
///
/// There is no `Up`: pieces only ever move sideways or fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    /// `(dcol, drow)` offset of a one-cell move.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, -1),
        }
    }
}

/// Board coordinate (column, row), row 0 at the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Position shifted by `(dcol, drow)`.
    pub const fn offset(self, dcol: i32, drow: i32) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
        }
    }
}

/// Player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    Pause,
    Restart,
}

/// Gravity speed presets offered at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Speed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Speed {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(Speed::Slow),
            "medium" => Some(Speed::Medium),
            "fast" => Some(Speed::Fast),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Speed::Slow => "slow",
            Speed::Medium => "medium",
            Speed::Fast => "fast",
        }
    }

    /// Milliseconds between two automatic gravity steps.
    pub fn gravity_ms(&self) -> u32 {
        match self {
            Speed::Slow => SLOW_GRAVITY_MS,
            Speed::Medium => MEDIUM_GRAVITY_MS,
            Speed::Fast => FAST_GRAVITY_MS,
        }
    }
}

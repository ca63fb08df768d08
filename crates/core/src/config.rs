//! Session configuration supplied by the front-end at start-up.

use crate::error::{Error, Result};
use crate::types::{
    Speed, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_WIN_THRESHOLD, MAX_GRID_DIM,
    MIN_GRID_DIM,
};

/// Grid dimensions, win condition and gravity timing for one session.
///
/// `gravity_ms` is presentation timing only; nothing in the grid engine
/// depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub height: usize,
    pub width: usize,
    pub win_threshold: u32,
    pub gravity_ms: u32,
}

impl GameConfig {
    /// Default dimensions and threshold with the gravity of a speed preset.
    pub fn with_speed(speed: Speed) -> Self {
        Self {
            gravity_ms: speed.gravity_ms(),
            ..Self::default()
        }
    }

    /// Check every field, returning the first violation.
    pub fn validate(&self) -> Result<()> {
        validate_dims(self.height, self.width)?;
        if self.win_threshold < 4 || !self.win_threshold.is_power_of_two() {
            return Err(Error::InvalidConfig(format!(
                "win threshold must be a power of two >= 4, got {}",
                self.win_threshold
            )));
        }
        if self.gravity_ms == 0 {
            return Err(Error::InvalidConfig("gravity interval must be > 0ms".into()));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_GRID_HEIGHT,
            width: DEFAULT_GRID_WIDTH,
            win_threshold: DEFAULT_WIN_THRESHOLD,
            gravity_ms: Speed::default().gravity_ms(),
        }
    }
}

pub(crate) fn validate_dims(height: usize, width: usize) -> Result<()> {
    let ok = |d: usize| (MIN_GRID_DIM..=MAX_GRID_DIM).contains(&d);
    if !ok(height) || !ok(width) {
        return Err(Error::InvalidConfig(format!(
            "grid must be between {MIN_GRID_DIM} and {MAX_GRID_DIM} cells on each side, got {height}x{width}"
        )));
    }
    Ok(())
}

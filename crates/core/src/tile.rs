//! Tile module - a single numbered cell
//!
//! A tile carries nothing but its value. The value starts at 2 or 4 and can
//! only ever double; a tile disappears when it is merged away or its row is
//! cleared. Display colours are a renderer concern and live in the `term` crate.

use crate::error::{Error, Result};
use crate::types::SPAWN_VALUES;

/// A numbered tile (value is a power of two >= 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    value: u32,
}

impl Tile {
    /// Create a tile, rejecting values that are not a power of two >= 2.
    pub fn new(value: u32) -> Result<Self> {
        if value < 2 || !value.is_power_of_two() {
            return Err(Error::InvalidArgument(format!(
                "tile value must be a power of two >= 2, got {value}"
            )));
        }
        Ok(Self { value })
    }

    /// Tile for a spawn draw.
    ///
    /// A `ValueSource` must only yield values from `SPAWN_VALUES`; anything
    /// else is a broken source and panics in debug builds. Release builds
    /// keep the draw when it is still a valid tile value and use 2 otherwise.
    pub(crate) fn spawned(value: u32) -> Self {
        debug_assert!(
            SPAWN_VALUES.contains(&value),
            "spawn value must be 2 or 4, got {value}"
        );
        match Self::new(value) {
            Ok(tile) => tile,
            Err(_) => Self { value: 2 },
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Double the value in place (merge result). Returns the new value.
    pub fn double(&mut self) -> u32 {
        self.value = self.value.saturating_mul(2);
        self.value
    }
}

//! Tile colours.
//!
//! 2 and 4 use soft sand tones; larger values follow the
//! familiar 2048 palette, warming up towards 2048 and turning dark beyond it.

use crate::fb::{CellStyle, Rgb};

/// Board background behind empty cells.
pub const EMPTY_CELL: Rgb = Rgb::new(206, 195, 181);
/// Grid dots on empty cells.
pub const GRID_LINE: Rgb = Rgb::new(185, 171, 158);
/// Board frame.
pub const BOUNDARY: Rgb = Rgb::new(132, 122, 113);

const DARK_TEXT: Rgb = Rgb::new(159, 149, 138);
const LIGHT_TEXT: Rgb = Rgb::new(249, 246, 242);

/// Tile background for a value.
pub fn tile_bg(value: u32) -> Rgb {
    match value {
        2 => Rgb::new(238, 228, 218),
        4 => Rgb::new(236, 224, 200),
        8 => Rgb::new(242, 177, 121),
        16 => Rgb::new(245, 149, 99),
        32 => Rgb::new(246, 124, 95),
        64 => Rgb::new(246, 94, 59),
        128 => Rgb::new(237, 207, 114),
        256 => Rgb::new(237, 204, 97),
        512 => Rgb::new(237, 200, 80),
        1024 => Rgb::new(237, 197, 63),
        2048 => Rgb::new(237, 194, 46),
        _ => Rgb::new(60, 58, 50),
    }
}

/// Number colour for a value.
pub fn tile_fg(value: u32) -> Rgb {
    if value <= 4 {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}

pub fn tile_style(value: u32) -> CellStyle {
    CellStyle::new(tile_fg(value), tile_bg(value)).bold()
}

pub fn empty_style() -> CellStyle {
    CellStyle::new(GRID_LINE, EMPTY_CELL)
}

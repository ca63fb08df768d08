//! Tetromino module - the falling piece and its transforms
//!
//! A tetromino owns four [`Tile`]s laid out on a 4x4 local frame. The frame is
//! indexed `frame[row][col]` with row 0 at the bottom, the same orientation as
//! the board, and `anchor` is the board position of the frame's bottom-left
//! cell. Every transform is "try, check with [`Grid::can_place`], commit or
//! leave untouched": a rejected move or rotation never changes the piece.
//!
//! Rotation turns the whole 4x4 frame a quarter turn clockwise about its
//! centre. There are no wall kicks.

use arrayvec::ArrayVec;

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::rng::ValueSource;
use crate::tile::Tile;
use crate::types::{Direction, Position, Shape, FRAME_SIZE};

/// Local 4x4 frame, `frame[row][col]`, row 0 at the bottom.
pub type Frame = [[Option<Tile>; FRAME_SIZE]; FRAME_SIZE];

/// One row of a [`BoundedFrame`].
pub type FrameRow = ArrayVec<Option<Tile>, FRAME_SIZE>;

/// Occupied `(col, row)` cells of each shape in its spawn orientation.
///
/// Layouts, top row first:
///
/// ```text
///  I      O      Z      S      J      L      T
/// .#..   ##..   ##..   .##.   .#..   .#..   ###.
/// .#..   ##..   .##.   ##..   .#..   .#..   .#..
/// .#..   ....   ....   ....   ##..   .##.   ....
/// .#..   ....   ....   ....   ....   ....   ....
/// ```
pub fn shape_cells(shape: Shape) -> [(usize, usize); 4] {
    match shape {
        Shape::I => [(1, 0), (1, 1), (1, 2), (1, 3)],
        Shape::O => [(0, 2), (1, 2), (0, 3), (1, 3)],
        Shape::Z => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Shape::S => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Shape::J => [(0, 1), (1, 1), (1, 2), (1, 3)],
        Shape::L => [(1, 1), (2, 1), (1, 2), (1, 3)],
        Shape::T => [(1, 1), (0, 2), (1, 2), (2, 2)],
    }
}

/// Occupied cells of a frame as `(col, row, tile)`, bottom row first.
pub fn frame_cells(frame: &Frame) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
    frame.iter().enumerate().flat_map(|(row, cells)| {
        cells
            .iter()
            .enumerate()
            .filter_map(move |(col, cell)| cell.map(|tile| (col, row, tile)))
    })
}

/// Quarter turn clockwise about the frame centre.
///
/// With rows growing upward, `(col, row)` maps to `(row, FRAME_SIZE - 1 - col)`.
pub fn rotate_frame_cw(frame: &Frame) -> Frame {
    let mut rotated: Frame = [[None; FRAME_SIZE]; FRAME_SIZE];
    for (col, row, tile) in frame_cells(frame) {
        rotated[FRAME_SIZE - 1 - col][row] = Some(tile);
    }
    rotated
}

/// The smallest sub-rectangle of a frame holding every tile, placed on the board.
///
/// `rows[0]` is the bottom row and `origin` is the board position of its first
/// cell. This is what [`Grid::lock_and_resolve`] consumes, so the grid never has
/// to know about the 4x4 local frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundedFrame {
    pub rows: ArrayVec<FrameRow, FRAME_SIZE>,
    pub origin: Position,
}

impl BoundedFrame {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map(|row| row.len()).unwrap_or(0)
    }

    /// Occupied cells with their board positions.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        let origin = self.origin;
        self.rows.iter().enumerate().flat_map(move |(dr, row)| {
            row.iter().enumerate().filter_map(move |(dc, cell)| {
                cell.map(|tile| (origin.offset(dc as i32, dr as i32), tile))
            })
        })
    }

    pub fn tile_count(&self) -> usize {
        self.cells().count()
    }

    /// Build a frame from bottom-up rows of values (0 = empty).
    ///
    /// Row widths are taken as given, so a ragged frame can be built and is
    /// rejected later by the grid. More than four rows or columns, or a value
    /// that is not a power of two >= 2, is an error.
    pub fn from_values(rows: &[&[u32]], origin: Position) -> Result<Self> {
        if rows.len() > FRAME_SIZE || rows.iter().any(|row| row.len() > FRAME_SIZE) {
            return Err(Error::InvalidArgument(format!(
                "frame larger than {FRAME_SIZE}x{FRAME_SIZE}"
            )));
        }
        let mut frame_rows = ArrayVec::new();
        for values in rows {
            let mut row = FrameRow::new();
            for &v in values.iter() {
                row.push(if v == 0 { None } else { Some(Tile::new(v)?) });
            }
            frame_rows.push(row);
        }
        Ok(Self {
            rows: frame_rows,
            origin,
        })
    }
}

/// Active falling piece
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tetromino {
    shape: Shape,
    frame: Frame,
    anchor: Position,
}

impl Tetromino {
    /// Create a piece at `anchor`, drawing one value per tile from `values`.
    pub fn new(shape: Shape, values: &mut dyn ValueSource, anchor: Position) -> Self {
        let mut frame: Frame = [[None; FRAME_SIZE]; FRAME_SIZE];
        for (col, row) in shape_cells(shape) {
            frame[row][col] = Some(Tile::spawned(values.next_value()));
        }
        Self {
            shape,
            frame,
            anchor,
        }
    }

    /// Create a piece with explicit tile values, assigned in [`shape_cells`] order.
    ///
    /// Values go through [`Tile::new`], so any power of two >= 2 is accepted.
    pub fn with_values(shape: Shape, values: [u32; 4], anchor: Position) -> Result<Self> {
        let mut frame: Frame = [[None; FRAME_SIZE]; FRAME_SIZE];
        for ((col, row), value) in shape_cells(shape).into_iter().zip(values) {
            frame[row][col] = Some(Tile::new(value)?);
        }
        Ok(Self {
            shape,
            frame,
            anchor,
        })
    }

    /// Create a piece at the spawn position of `grid`.
    ///
    /// The piece is centred horizontally and its lowest tile sits on row
    /// `grid.height()`, one row above the visible board, so the spawn placement
    /// is always legal.
    pub fn spawn(shape: Shape, values: &mut dyn ValueSource, grid: &Grid) -> Self {
        let mut piece = Self::new(shape, values, Position::default());
        piece.anchor = piece.spawn_anchor(grid.height(), grid.width());
        piece
    }

    fn spawn_anchor(&self, height: usize, width: usize) -> Position {
        let (mut min_col, mut max_col, mut min_row) = (FRAME_SIZE, 0, FRAME_SIZE);
        for (col, row, _) in frame_cells(&self.frame) {
            min_col = min_col.min(col);
            max_col = max_col.max(col);
            min_row = min_row.min(row);
        }
        let span = max_col + 1 - min_col;
        let col = (width.saturating_sub(span) / 2) as i32 - min_col as i32;
        let row = height as i32 - min_row as i32;
        Position::new(col, row)
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Occupied tiles with their board positions.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        let anchor = self.anchor;
        frame_cells(&self.frame)
            .map(move |(col, row, tile)| (anchor.offset(col as i32, row as i32), tile))
    }

    /// Try a one-cell translation.
    ///
    /// Returns false and leaves the piece untouched if the target placement is
    /// illegal. For [`Direction::Down`] that means the piece has landed.
    pub fn try_move(&mut self, direction: Direction, grid: &Grid) -> bool {
        let (dcol, drow) = direction.delta();
        let candidate = self.anchor.offset(dcol, drow);
        if !grid.can_place(&self.frame, candidate) {
            return false;
        }
        self.anchor = candidate;
        true
    }

    /// Drop straight down until blocked. Returns the number of rows fallen.
    ///
    /// The piece is always resting on something afterwards; callers lock it
    /// immediately.
    pub fn hard_drop(&mut self, grid: &Grid) -> u32 {
        let mut distance = 0;
        while self.try_move(Direction::Down, grid) {
            distance += 1;
        }
        distance
    }

    /// Anchor the piece would rest at after a hard drop (for ghost rendering).
    pub fn ghost_anchor(&self, grid: &Grid) -> Position {
        let mut anchor = self.anchor;
        while grid.can_place(&self.frame, anchor.offset(0, -1)) {
            anchor = anchor.offset(0, -1);
        }
        anchor
    }

    /// Rotate a quarter turn clockwise in place, or leave untouched if blocked.
    pub fn rotate_clockwise(&mut self, grid: &Grid) -> bool {
        let rotated = rotate_frame_cw(&self.frame);
        if !grid.can_place(&rotated, self.anchor) {
            return false;
        }
        self.frame = rotated;
        true
    }

    /// Lock payload: the tight bounding box of the tiles and its board origin.
    pub fn get_min_bounded_frame(&self) -> BoundedFrame {
        let (mut min_col, mut max_col) = (FRAME_SIZE, 0);
        let (mut min_row, mut max_row) = (FRAME_SIZE, 0);
        for (col, row, _) in frame_cells(&self.frame) {
            min_col = min_col.min(col);
            max_col = max_col.max(col);
            min_row = min_row.min(row);
            max_row = max_row.max(row);
        }

        let mut rows = ArrayVec::new();
        if min_row > max_row {
            return BoundedFrame {
                rows,
                origin: self.anchor,
            };
        }
        for row in min_row..=max_row {
            rows.push(self.frame[row][min_col..=max_col].iter().copied().collect());
        }
        BoundedFrame {
            rows,
            origin: self.anchor.offset(min_col as i32, min_row as i32),
        }
    }
}

//! Grid module - the settled board
//!
//! The grid is an `height x width` matrix of optional [`Tile`]s stored as a flat
//! array in row-major order, row 0 at the floor. It owns everything that
//! happens once a piece stops falling:
//!
//! 1. **Lock**: the piece's tiles are moved into their cells. A tile that lands
//!    at or above `height` tops the board out.
//! 2. **Merge**: vertically adjacent equal tiles combine into one tile of double
//!    value, the column above closes the gap, and passes repeat until stable.
//! 3. **Clear**: every full row is removed in one step and scores the sum of its
//!    tile values.
//! 4. **Termination**: a tile at or above the win threshold ends the game with
//!    a win; a top-out ends it with a loss.
//!
//! Once `game_over` is set the grid refuses further locks.

use crate::config::{validate_dims, GameConfig};
use crate::error::{Error, Result};
use crate::tetromino::{frame_cells, BoundedFrame, Frame};
use crate::tile::Tile;
use crate::types::{Position, DEFAULT_WIN_THRESHOLD, FRAME_SIZE};

/// Cell on the board (None = empty)
pub type Cell = Option<Tile>;

/// Totals of one merge resolution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStats {
    /// Number of pairwise merges performed.
    pub merges: u32,
    /// Full scans of the board, including the final scan that found nothing.
    pub passes: u32,
    /// Score gained (sum of every merge result).
    pub points: u32,
    /// Largest tile produced by a merge (0 when nothing merged).
    pub max_merged: u32,
}

/// Result of [`Grid::lock_and_resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LockOutcome {
    pub game_over: bool,
    pub win: bool,
    /// Total score after the lock.
    pub score: u32,
    /// Whether a tile landed above the visible board.
    pub topped_out: bool,
    pub merges: u32,
    /// Indices of the cleared rows (bottom to top, pre-clear numbering).
    pub rows_cleared: Vec<usize>,
    /// Score gained by this lock (merges plus cleared rows).
    pub points: u32,
}

/// The settled board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    win_threshold: u32,
    /// Flat array of cells, row-major order (row * width + col), row 0 at the floor
    cells: Vec<Cell>,
    score: u32,
    game_over: bool,
    win: bool,
}

impl Grid {
    /// Create an empty grid with the default win threshold.
    pub fn new(height: usize, width: usize) -> Result<Self> {
        validate_dims(height, width)?;
        Ok(Self {
            height,
            width,
            win_threshold: DEFAULT_WIN_THRESHOLD,
            cells: vec![None; height * width],
            score: 0,
            game_over: false,
            win: false,
        })
    }

    /// Create an empty grid from a session configuration.
    pub fn from_config(config: &GameConfig) -> Result<Self> {
        config.validate()?;
        let mut grid = Self::new(config.height, config.width)?;
        grid.win_threshold = config.win_threshold;
        Ok(grid)
    }

    /// Same grid with a different win threshold (a power of two >= 4).
    pub fn with_win_threshold(mut self, win_threshold: u32) -> Result<Self> {
        if win_threshold < 4 || !win_threshold.is_power_of_two() {
            return Err(Error::InvalidConfig(format!(
                "win threshold must be a power of two >= 4, got {win_threshold}"
            )));
        }
        self.win_threshold = win_threshold;
        Ok(self)
    }

    /// Calculate flat index from (col, row) coordinates
    #[inline(always)]
    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn win_threshold(&self) -> u32 {
        self.win_threshold
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn win(&self) -> bool {
        self.win
    }

    /// Get cell at position (col, row)
    /// Returns None if out of bounds
    pub fn get(&self, col: i32, row: i32) -> Option<Cell> {
        self.index(col, row).map(|idx| self.cells[idx])
    }

    /// Checked cell query for renderers and tests.
    ///
    /// Out-of-range coordinates are a caller bug and fail with
    /// [`Error::InvalidArgument`].
    pub fn cell(&self, row: usize, col: usize) -> Result<Cell> {
        if row >= self.height || col >= self.width {
            return Err(Error::InvalidArgument(format!(
                "cell ({row}, {col}) outside {}x{} grid",
                self.height, self.width
            )));
        }
        Ok(self.cells[row * self.width + col])
    }

    /// Set cell at position (col, row)
    /// Returns false if out of bounds
    pub fn set(&mut self, col: i32, row: i32, cell: Cell) -> bool {
        match self.index(col, row) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Get a reference to the internal cells array (row-major, row 0 first)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Whether a falling tile may occupy (col, row).
    ///
    /// Columns must be on the board and rows non-negative. Rows at or above the
    /// top are free (the piece is still entering); in-bounds cells must be empty.
    pub fn is_free(&self, col: i32, row: i32) -> bool {
        if col < 0 || col as usize >= self.width || row < 0 {
            return false;
        }
        if row as usize >= self.height {
            return true;
        }
        matches!(self.get(col, row), Some(None))
    }

    /// Whether every tile of `frame` can sit with the frame's bottom-left at `anchor`.
    pub fn can_place(&self, frame: &Frame, anchor: Position) -> bool {
        frame_cells(frame)
            .all(|(col, row, _)| self.is_free(anchor.col + col as i32, anchor.row + row as i32))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= self.height {
            return false;
        }
        let start = row * self.width;
        self.cells[start..start + self.width]
            .iter()
            .all(|cell| cell.is_some())
    }

    /// Lock a frame, merge, clear full rows and evaluate termination.
    ///
    /// The frame is validated before anything is touched: it must hold at least
    /// one tile in a rectangular layout no larger than 4x4, and every tile must
    /// map to an on-board column, a non-negative row, and (below the top) an
    /// empty cell. Violations are [`Error::InvalidArgument`] and leave the grid
    /// unchanged. Locking into a finished game is a no-op.
    pub fn lock_and_resolve(&mut self, frame: &BoundedFrame) -> Result<LockOutcome> {
        if self.game_over {
            return Ok(self.outcome());
        }
        self.validate_frame(frame)?;
        Ok(self.commit(frame))
    }

    /// Lock step only: move every tile of `frame` into the grid.
    ///
    /// Returns whether the lock topped the board out. Merge resolution and line
    /// clears are not run; see [`Grid::lock_and_resolve`] for the full sequence.
    pub fn lock(&mut self, frame: &BoundedFrame) -> Result<bool> {
        if self.game_over {
            return Ok(true);
        }
        self.validate_frame(frame)?;
        Ok(self.place(frame))
    }

    /// Full lock sequence for a frame already known to be well-formed.
    pub(crate) fn commit(&mut self, frame: &BoundedFrame) -> LockOutcome {
        if self.game_over {
            return self.outcome();
        }
        let score_before = self.score;
        let topped_out = self.place(frame);
        let stats = self.resolve_merges();
        let rows_cleared = self.clear_full_rows();
        // A merged tile counts even if its row is cleared right after.
        self.check_win(stats.max_merged);

        LockOutcome {
            topped_out,
            merges: stats.merges,
            rows_cleared,
            points: self.score - score_before,
            ..self.outcome()
        }
    }

    fn outcome(&self) -> LockOutcome {
        LockOutcome {
            game_over: self.game_over,
            win: self.win,
            score: self.score,
            ..LockOutcome::default()
        }
    }

    fn validate_frame(&self, frame: &BoundedFrame) -> Result<()> {
        let width = frame.width();
        if frame.height() == 0 || width == 0 {
            return Err(Error::InvalidArgument("lock frame is empty".into()));
        }
        if width > FRAME_SIZE || frame.rows.iter().any(|row| row.len() != width) {
            return Err(Error::InvalidArgument(
                "lock frame rows must all have the same width (at most 4)".into(),
            ));
        }
        if frame.tile_count() == 0 {
            return Err(Error::InvalidArgument("lock frame has no tiles".into()));
        }
        for (pos, _) in frame.cells() {
            if pos.col < 0 || pos.col as usize >= self.width || pos.row < 0 {
                return Err(Error::InvalidArgument(format!(
                    "lock frame tile at ({}, {}) is off the board",
                    pos.col, pos.row
                )));
            }
            if !self.is_free(pos.col, pos.row) {
                return Err(Error::InvalidArgument(format!(
                    "lock frame tile at ({}, {}) overlaps a settled tile",
                    pos.col, pos.row
                )));
            }
        }
        Ok(())
    }

    /// Move tiles into their cells; tiles above the top set `game_over`.
    fn place(&mut self, frame: &BoundedFrame) -> bool {
        let mut topped_out = false;
        for (pos, tile) in frame.cells() {
            if !self.set(pos.col, pos.row, Some(tile)) {
                topped_out = true;
            }
        }
        if topped_out {
            self.game_over = true;
        }
        topped_out
    }

    /// Merge vertically adjacent equal tiles until a full pass finds none.
    ///
    /// Each pass scans every column bottom to top. A tile at `row` merges with
    /// an equal tile at `row + 1`: it doubles, the upper tile is removed, and
    /// the scan resumes two rows higher, so a freshly doubled tile waits for
    /// the next pass. After the scan of a column, tiles above its lowest
    /// removed slot fall until blocked.
    ///
    /// A column that finds no merge is unchanged and stays stable, and every
    /// productive pass removes at least one of a column's at most `height`
    /// tiles. So at most `height - 1` productive passes plus the final empty
    /// one are ever needed; the loop is capped at `height` passes.
    pub fn resolve_merges(&mut self) -> MergeStats {
        let mut stats = MergeStats::default();
        for _ in 0..self.height {
            stats.passes += 1;
            let mut merged = 0;
            for col in 0..self.width {
                merged += self.merge_column(col, &mut stats);
            }
            stats.merges += merged;
            if merged == 0 {
                break;
            }
        }
        self.score = self.score.saturating_add(stats.points);
        stats
    }

    /// One merge scan over a single column. Returns the merge count and adds
    /// points and the largest result to `stats`.
    fn merge_column(&mut self, col: usize, stats: &mut MergeStats) -> u32 {
        let width = self.width;
        let mut merges = 0;
        let mut lowest_gap: Option<usize> = None;

        let mut row = 0;
        while row + 1 < self.height {
            let lower = row * width + col;
            let upper = lower + width;
            match (self.cells[lower], self.cells[upper]) {
                (Some(mut a), Some(b)) if a.value() == b.value() => {
                    let doubled = a.double();
                    stats.points = stats.points.saturating_add(doubled);
                    stats.max_merged = stats.max_merged.max(doubled);
                    self.cells[lower] = Some(a);
                    self.cells[upper] = None;
                    if lowest_gap.is_none() {
                        lowest_gap = Some(row + 1);
                    }
                    merges += 1;
                    row += 2;
                }
                _ => row += 1,
            }
        }

        if let Some(gap) = lowest_gap {
            self.settle_column_from(col, gap);
        }
        merges
    }

    /// Tiles at or above `from_row` fall until blocked, preserving order.
    fn settle_column_from(&mut self, col: usize, from_row: usize) {
        let width = self.width;
        let mut write = from_row;
        for read in from_row..self.height {
            let Some(tile) = self.cells[read * width + col].take() else {
                continue;
            };
            self.cells[write * width + col] = Some(tile);
            write += 1;
        }
    }

    /// Clear all full rows and return the row indices that were cleared (sorted bottom to top)
    ///
    /// Rows are identified first and removed together: survivors shift down by
    /// the number of cleared rows beneath them and the top fills with empty
    /// rows. Every tile in a cleared row adds its value to the score.
    pub fn clear_full_rows(&mut self) -> Vec<usize> {
        let width = self.width;
        let cleared: Vec<usize> = (0..self.height).filter(|&r| self.is_row_full(r)).collect();
        if cleared.is_empty() {
            return cleared;
        }

        let points: u32 = cleared
            .iter()
            .flat_map(|&r| self.cells[r * width..(r + 1) * width].iter())
            .flatten()
            .map(|tile| tile.value())
            .sum();

        // Two-pointer compaction, bottom to top.
        let mut write = 0;
        for read in 0..self.height {
            if cleared.binary_search(&read).is_ok() {
                continue;
            }
            if write != read {
                self.cells
                    .copy_within(read * width..(read + 1) * width, write * width);
            }
            write += 1;
        }
        for cell in &mut self.cells[write * width..] {
            *cell = None;
        }

        self.score = self.score.saturating_add(points);
        cleared
    }

    /// Largest tile value on the board (0 when empty).
    pub fn max_value(&self) -> u32 {
        self.cells
            .iter()
            .flatten()
            .map(|tile| tile.value())
            .max()
            .unwrap_or(0)
    }

    /// Set `win` and `game_over` if a tile on the board, or `reached` during
    /// the lock, is at or above the threshold.
    fn check_win(&mut self, reached: u32) -> bool {
        if reached.max(self.max_value()) >= self.win_threshold {
            self.win = true;
            self.game_over = true;
        }
        self.win
    }

    /// Clear the entire board and reset score and flags.
    pub fn reset(&mut self) {
        self.cells.fill(None);
        self.score = 0;
        self.game_over = false;
        self.win = false;
    }

    /// Create from bottom-up rows of values for testing (0 = empty)
    #[cfg(test)]
    pub fn from_values(rows: &[&[u32]], width: usize) -> Self {
        let mut grid = Self::new(rows.len().max(4), width).unwrap();
        for (row, values) in rows.iter().enumerate() {
            for (col, &v) in values.iter().enumerate() {
                if v != 0 {
                    grid.set(col as i32, row as i32, Some(Tile::new(v).unwrap()));
                }
            }
        }
        grid
    }

    /// Column contents bottom-up for testing (0 = empty)
    #[cfg(test)]
    pub fn column(&self, col: usize) -> Vec<u32> {
        (0..self.height)
            .map(|row| self.cells[row * self.width + col].map_or(0, |t| t.value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::FrameRow;
    use arrayvec::ArrayVec;

    fn tile(v: u32) -> Option<Tile> {
        Some(Tile::new(v).unwrap())
    }

    fn frame(rows: &[&[u32]], origin: Position) -> BoundedFrame {
        let rows = rows
            .iter()
            .map(|r| {
                r.iter()
                    .map(|&v| if v == 0 { None } else { tile(v) })
                    .collect::<FrameRow>()
            })
            .collect::<ArrayVec<FrameRow, FRAME_SIZE>>();
        BoundedFrame { rows, origin }
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(6, 4).unwrap();
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(3, 0), Some(3));
        assert_eq!(grid.index(0, 1), Some(4));
        assert_eq!(grid.index(3, 5), Some(23));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(4, 0), None);
        assert_eq!(grid.index(0, 6), None);
    }

    #[test]
    fn test_is_free_allows_rows_above_top() {
        let grid = Grid::new(6, 4).unwrap();
        assert!(grid.is_free(0, 6));
        assert!(grid.is_free(3, 40));
        assert!(!grid.is_free(0, -1));
        assert!(!grid.is_free(-1, 7));
        assert!(!grid.is_free(4, 7));
    }

    #[test]
    fn test_chain_merge_needs_second_pass() {
        // 2,2,4 bottom-up: the first pass makes 4 and settles it under the old
        // 4, the second pass makes 8, the third finds nothing.
        let mut grid = Grid::from_values(&[&[2], &[2], &[4]], 4);
        let stats = grid.resolve_merges();
        assert_eq!(grid.column(0)[..3], [8, 0, 0]);
        assert_eq!(stats.merges, 2);
        assert_eq!(stats.passes, 3);
        assert_eq!(stats.points, 4 + 8);
        assert_eq!(stats.max_merged, 8);
        assert_eq!(grid.score(), 12);
    }

    #[test]
    fn test_two_pairs_merge_in_one_pass() {
        // 2,2,4,4: both pairs merge in the first pass and settle as 4,8,
        // which the second pass leaves alone.
        let mut grid = Grid::from_values(&[&[2], &[2], &[4], &[4]], 4);
        let stats = grid.resolve_merges();
        assert_eq!(grid.column(0), vec![4, 8, 0, 0]);
        assert_eq!(stats.merges, 2);
        assert_eq!(stats.passes, 2);
        assert_eq!(stats.points, 4 + 8);
    }

    #[test]
    fn test_merge_leaves_gap_below_lowest_merge() {
        // Overhang gap at row 1 under a mergeable pair: the pair merges and the
        // gap below it stays.
        let mut grid = Grid::from_values(&[&[4], &[0], &[2], &[2], &[8]], 4);
        grid.resolve_merges();
        assert_eq!(grid.column(0)[..5], [4, 0, 4, 8, 0]);
    }

    #[test]
    fn test_settle_closes_older_gaps_above_merge() {
        let mut grid = Grid::from_values(&[&[2], &[2], &[0], &[16]], 4);
        grid.resolve_merges();
        assert_eq!(grid.column(0)[..4], [4, 16, 0, 0]);
    }

    #[test]
    fn test_columns_without_merges_keep_their_gaps() {
        let mut grid = Grid::from_values(&[&[2, 4], &[2, 0], &[0, 8]], 4);
        grid.resolve_merges();
        assert_eq!(grid.column(1)[..3], [4, 0, 8]);
    }

    #[test]
    fn test_horizontal_neighbours_never_merge() {
        let mut grid = Grid::from_values(&[&[2, 2, 2, 0]], 4);
        let stats = grid.resolve_merges();
        assert_eq!(stats.merges, 0);
        assert_eq!(stats.passes, 1);
        assert_eq!(grid.score(), 0);
    }

    #[test]
    fn test_lock_rejects_malformed_frames() {
        let mut grid = Grid::new(6, 4).unwrap();
        let empty = BoundedFrame {
            rows: ArrayVec::new(),
            origin: Position::new(0, 0),
        };
        assert!(matches!(
            grid.lock_and_resolve(&empty),
            Err(Error::InvalidArgument(_))
        ));

        let ragged = frame(&[&[2, 2], &[2]], Position::new(0, 0));
        assert!(matches!(
            grid.lock_and_resolve(&ragged),
            Err(Error::InvalidArgument(_))
        ));

        let holes_only = frame(&[&[0, 0]], Position::new(0, 0));
        assert!(grid.lock_and_resolve(&holes_only).is_err());

        let off_side = frame(&[&[2, 2]], Position::new(3, 0));
        assert!(grid.lock_and_resolve(&off_side).is_err());

        let below_floor = frame(&[&[2]], Position::new(0, -1));
        assert!(grid.lock_and_resolve(&below_floor).is_err());

        assert_eq!(grid, Grid::new(6, 4).unwrap());
    }

    #[test]
    fn test_lock_rejects_overlap_without_mutation() {
        let mut grid = Grid::new(6, 4).unwrap();
        grid.set(1, 0, tile(8));
        let before = grid.clone();
        let overlapping = frame(&[&[2, 4]], Position::new(0, 0));
        assert!(grid.lock_and_resolve(&overlapping).is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_lock_only_places_tiles() {
        let mut grid = Grid::new(6, 4).unwrap();
        let pair = frame(&[&[2], &[2]], Position::new(0, 0));
        assert_eq!(grid.lock(&pair), Ok(false));
        // No merge yet.
        assert_eq!(grid.column(0)[..2], [2, 2]);
        assert_eq!(grid.score(), 0);
    }

    #[test]
    fn test_clear_scores_pre_clear_values() {
        let mut grid = Grid::from_values(&[&[2, 4, 8, 16], &[0, 32, 0, 0]], 4);
        let cleared = grid.clear_full_rows();
        assert_eq!(cleared, vec![0]);
        assert_eq!(grid.score(), 30);
        assert_eq!(grid.column(1)[..2], [32, 0]);
    }

    #[test]
    fn test_win_threshold_is_configurable() {
        let mut grid = Grid::new(6, 4).unwrap().with_win_threshold(16).unwrap();
        let pair = frame(&[&[8], &[8]], Position::new(2, 0));
        let outcome = grid.lock_and_resolve(&pair).unwrap();
        assert!(outcome.win);
        assert!(outcome.game_over);
        assert!(Grid::new(6, 4).unwrap().with_win_threshold(12).is_err());
    }

    #[test]
    fn test_lock_after_game_over_is_noop() {
        let mut grid = Grid::new(6, 4).unwrap();
        let high = frame(&[&[2]], Position::new(0, 6));
        assert!(grid.lock_and_resolve(&high).unwrap().game_over);

        let before = grid.clone();
        let low = frame(&[&[2]], Position::new(1, 0));
        let outcome = grid.lock_and_resolve(&low).unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.merges, 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_reset() {
        let mut grid = Grid::from_values(&[&[2, 4]], 4);
        grid.clear_full_rows();
        grid.set(0, 0, tile(2));
        grid.reset();
        assert!(grid.cells().iter().all(|c| c.is_none()));
        assert_eq!(grid.score(), 0);
        assert!(!grid.game_over());
    }
}
